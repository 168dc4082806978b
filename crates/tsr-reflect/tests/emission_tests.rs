//! Rendering of the metadata table: JSON, script and package layouts.

use serde_json::Value;
use std::path::PathBuf;
use tsr_host::{Program, ProgramBuilder, TypeHandle};
use tsr_reflect::{
    MetadataTable, NewLine, PackageLayout, ReflectOptions, ScriptRenderer, SlotId, reflect,
};

/// `file1.ts`: `A { b: B }`, `B { a: A }`, `namespace ns { class Inner }`.
fn sample() -> Program {
    let mut b = ProgramBuilder::new();
    let a = b.interface("A");
    let bb = b.interface("B");
    b.property(a, "b", bb);
    b.property(bb, "a", a);
    let inner = b.class("Inner");
    b.optional_property(inner, "x", TypeHandle::NUMBER);
    let file = b.file("file1.ts");
    b.declare(&file, a);
    b.declare(&file, bb);
    let ns = b.namespace(&file, "ns");
    b.declare(&ns, inner);
    b.build().unwrap()
}

fn emit(program: &Program, options: ReflectOptions) -> MetadataTable {
    reflect(program, program.files(), options).table
}

#[test]
fn nested_layout_has_one_entry_per_namespace() {
    let table = emit(&sample(), ReflectOptions::default());
    let keys: Vec<&str> = table.packages.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["file1", "file1.ns"]);
    assert_eq!(table.lookup("file1", "A"), Some(SlotId(0)));
    assert_eq!(table.lookup("file1", "B"), Some(SlotId(1)));
    assert_eq!(table.lookup("file1.ns", "Inner"), Some(SlotId(2)));
}

#[test]
fn flat_layout_qualifies_names_per_file() {
    let options = ReflectOptions {
        package_layout: PackageLayout::Flat,
        ..ReflectOptions::default()
    };
    let table = emit(&sample(), options);
    assert_eq!(table.packages.len(), 1);
    let names: Vec<&str> = table.packages["file1"].keys().map(String::as_str).collect();
    assert_eq!(names, vec!["A", "B", "ns.Inner"]);
}

#[test]
fn root_dir_and_library_name_shape_the_keys() {
    let mut b = ProgramBuilder::new();
    let app = b.class("App");
    let file = b.file("src/app/main.ts");
    b.declare(&file, app);
    let program = b.build().unwrap();

    let options = ReflectOptions {
        library_name: "mylib".to_string(),
        root_dir: Some(PathBuf::from("src")),
        ..ReflectOptions::default()
    };
    let table = emit(&program, options);
    assert_eq!(table.library, "mylib");
    assert_eq!(table.lookup("app.main", "App"), Some(SlotId(0)));
}

#[test]
fn json_stages_appear_in_load_order() {
    let table = emit(&sample(), ReflectOptions::default());
    let json: Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["library", "slotCount", "intrinsics", "packages", "populations"]
    );
    assert_eq!(json["slotCount"], 3);
    assert_eq!(json["intrinsics"].as_array().unwrap().len(), 10);
    assert_eq!(json["intrinsics"][0], "any");

    let a = &json["populations"][0];
    assert_eq!(a["kind"], "interface");
    assert_eq!(a["name"], "A");
    assert_eq!(a["members"][0]["name"], "b");
    assert_eq!(a["members"][0]["type"]["slot"], 1);

    let inner = &json["populations"][2];
    assert_eq!(inner["kind"], "class");
    assert_eq!(inner["members"][0]["optional"], true);
    assert_eq!(inner["members"][0]["type"]["intrinsic"], "number");
}

#[test]
fn json_tables_reload_unchanged() {
    let table = emit(&sample(), ReflectOptions::default());
    let reloaded = MetadataTable::from_json(&table.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, table);
}

#[test]
fn script_allocates_slots_before_populating_them() {
    let table = emit(&sample(), ReflectOptions::default());
    let script = ScriptRenderer::new(NewLine::Lf).render(&table).unwrap();

    let allocate = script.find("for (var _cnt = 0; _cnt < 3; _cnt++) {").unwrap();
    let intrinsic = script.find("var _type_number = { kind: 'number' };").unwrap();
    let library = script.find("Reflection.$libs['default'] = {").unwrap();
    let populate = script.find("_t = _l[0];").unwrap();
    assert!(allocate < intrinsic && intrinsic < library && library < populate);

    assert!(script.contains("        'A': _l[0],\n"));
    assert!(script.contains("    'file1.ns': {\n"));
    assert!(script.contains("_t.kind = 'interface';\n"));
    assert!(script.contains("_t.name = 'B';\n"));
    assert!(script.contains("            type: _l[1],\n"));
    assert!(script.contains("            type: _type_number,\n"));
    assert!(!script.contains("_t.slot"));
}

#[test]
fn script_honours_crlf_and_quotes_names() {
    let mut b = ProgramBuilder::new();
    let odd = b.interface("It's");
    let file = b.file("quotes.ts");
    b.declare(&file, odd);
    let program = b.build().unwrap();

    let table = emit(&program, ReflectOptions::default());
    let script = ScriptRenderer::new(NewLine::Crlf).render(&table).unwrap();
    assert!(script.contains("_t.name = 'It\\'s';\r\n"));
    assert!(!script.replace("\r\n", "").contains('\n'));
}
