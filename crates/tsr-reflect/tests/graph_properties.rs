//! Whole-pass properties of type-graph discovery.

use rustc_hash::FxHashSet;
use tsr_common::diagnostics::diagnostic_codes;
use tsr_host::{DeclId, IntrinsicKind, Program, ProgramBuilder, SignatureInfo, TypeHandle};
use tsr_reflect::{
    MetadataTable, ReflectOptions, ReflectionPass, SlotId, TypeNode, TypeNodeKind, TypeRef,
    reflect,
};

fn run(program: &Program) -> MetadataTable {
    reflect(program, program.files(), ReflectOptions::default()).table
}

fn node<'t>(table: &'t MetadataTable, package: &str, name: &str) -> &'t TypeNode {
    let slot = table
        .lookup(package, name)
        .unwrap_or_else(|| panic!("{package}#{name} not in table"));
    table.population(slot).unwrap()
}

fn member_type(node: &TypeNode, member: &str) -> TypeRef {
    node.kind
        .body()
        .and_then(|body| body.members.iter().find(|m| m.name == member))
        .map(|m| m.ty)
        .unwrap_or_else(|| panic!("no member {member}"))
}

#[test]
fn identity_is_idempotent_across_reference_paths() {
    let mut b = ProgramBuilder::new();
    let first = b.array_of(TypeHandle::STRING);
    let second = b.array_of(TypeHandle::STRING);
    let holder = b.interface("Holder");
    b.property(holder, "x", first);
    b.property(holder, "y", second);
    let other = b.interface("Other");
    b.property(other, "z", second);
    let file = b.file("paths.ts");
    b.declare(&file, holder);
    b.declare(&file, other);
    let program = b.build().unwrap();

    let table = run(&program);
    let holder = node(&table, "paths", "Holder");
    let other = node(&table, "paths", "Other");
    assert_eq!(member_type(holder, "x"), member_type(holder, "y"));
    assert_eq!(member_type(holder, "x"), member_type(other, "z"));
    // Holder, Other and one string[].
    assert_eq!(table.slot_count, 3);
}

#[test]
fn every_slot_is_populated_exactly_once() {
    let mut b = ProgramBuilder::new();
    let a = b.interface("A");
    let c = b.class("C");
    let list = b.array_of(a);
    let union = b.union(&[a, c, list]);
    b.property(a, "c", c);
    b.property(c, "items", list);
    b.property(c, "either", union);
    let file = b.file("once.ts");
    b.declare(&file, a);
    b.declare(&file, c);
    let program = b.build().unwrap();

    let table = run(&program);
    let slots: Vec<SlotId> = table.populations.iter().map(|n| n.slot).collect();
    let unique: FxHashSet<SlotId> = slots.iter().copied().collect();
    assert_eq!(slots.len(), unique.len());
    assert_eq!(slots.len(), table.slot_count as usize);
}

#[test]
fn self_referencing_type_terminates() {
    let mut b = ProgramBuilder::new();
    let node_ty = b.interface("Node");
    b.property(node_ty, "next", node_ty);
    let file = b.file("list.ts");
    b.declare(&file, node_ty);
    let program = b.build().unwrap();

    let table = run(&program);
    assert_eq!(table.slot_count, 1);
    let n = node(&table, "list", "Node");
    assert_eq!(member_type(n, "next"), TypeRef::Slot(n.slot));
}

#[test]
fn references_stay_below_the_slot_count() {
    let mut b = ProgramBuilder::new();
    let t = b.type_parameter("T", None);
    let tree = b.class("Tree");
    b.type_parameters(tree, &[t]);
    let children = {
        let tree_of_t = b.reference(tree, &[t]);
        b.array_of(tree_of_t)
    };
    b.property(tree, "value", t);
    b.property(tree, "children", children);
    b.method(
        tree,
        "map",
        vec![SignatureInfo::new(tree).param("f", TypeHandle::ANY)],
    );
    let file = b.file("tree.ts");
    b.declare(&file, tree);
    let program = b.build().unwrap();

    let table = run(&program);
    for population in &table.populations {
        for slot in population.slot_refs() {
            assert!(slot.0 < table.slot_count, "{slot} out of range");
        }
    }
}

#[test]
fn forward_references_precede_their_population() {
    let mut b = ProgramBuilder::new();
    let a = b.interface("A");
    let later = b.interface("Later");
    b.property(a, "later", later);
    let file = b.file("fwd.ts");
    b.declare(&file, a);
    let program = b.build().unwrap();

    let table = run(&program);
    assert_eq!(table.populations[0].name.as_deref(), Some("A"));
    assert_eq!(member_type(&table.populations[0], "later"), TypeRef::Slot(SlotId(1)));
    assert_eq!(table.populations[1].slot, SlotId(1));
}

#[test]
fn name_collision_resolves_to_the_class() {
    let mut b = ProgramBuilder::new();
    let interface = b.interface("Foo");
    b.property(interface, "fromInterface", TypeHandle::STRING);
    let class = b.class("Foo");
    b.property(class, "fromClass", TypeHandle::NUMBER);
    let user = b.interface("User");
    b.property(user, "shape", interface);
    let file = b.file("scope.ts");
    b.declare(&file, interface);
    b.declare(&file, class);
    b.declare(&file, user);
    let program = b.build().unwrap();

    let output = reflect(&program, program.files(), ReflectOptions::default());
    let table = output.table;
    let foo = node(&table, "scope", "Foo");
    assert!(matches!(foo.kind, TypeNodeKind::Class { .. }));
    assert_eq!(member_type(foo, "fromClass"), TypeRef::Intrinsic(IntrinsicKind::Number));
    assert_eq!(table.packages["scope"].len(), 2);

    // The interface keeps its slot because User references it.
    let user = node(&table, "scope", "User");
    let shadowed = member_type(user, "shape").slot().unwrap();
    assert!(matches!(
        table.population(shadowed).unwrap().kind,
        TypeNodeKind::Interface { .. }
    ));
    assert_eq!(output.diagnostics.len(), 1);
}

#[test]
fn rest_parameter_arity_survives_the_pass() {
    let mut b = ProgramBuilder::new();
    let strings = b.array_of(TypeHandle::STRING);
    let api = b.interface("Api");
    b.method(
        api,
        "f",
        vec![
            SignatureInfo::new(TypeHandle::VOID)
                .param("a", TypeHandle::NUMBER)
                .rest_param("rest", strings),
        ],
    );
    let file = b.file("api.ts");
    b.declare(&file, api);
    let program = b.build().unwrap();

    let table = run(&program);
    let f = member_type(node(&table, "api", "Api"), "f").slot().unwrap();
    let TypeNodeKind::Function { signatures } = &table.population(f).unwrap().kind else {
        panic!("method is not a function slot");
    };
    assert_eq!(signatures[0].length, 1);
    assert!(signatures[0].rest);
    assert_eq!(signatures[0].parameters.len(), 2);
}

#[test]
fn mutually_recursive_declarations() {
    let mut b = ProgramBuilder::new();
    let a = b.interface("A");
    let bb = b.interface("B");
    b.property(a, "b", bb);
    b.property(bb, "a", a);
    let file = b.file("file1.ts");
    let a_decl = b.declare(&file, a);
    let b_decl = b.declare(&file, bb);
    let program = b.build().unwrap();

    let mut pass = ReflectionPass::new(&program, ReflectOptions::default());
    pass.run(program.files());
    let slot_a = pass.slot_of(a_decl).unwrap();
    let slot_b = pass.slot_of(b_decl).unwrap();
    assert!(slot_a < slot_b);
    assert!(pass.queue().is_empty());
    assert_eq!(pass.registry().len(), 2);

    let table = pass.finish().table;
    assert_eq!(member_type(table.population(slot_a).unwrap(), "b"), TypeRef::Slot(slot_b));
    assert_eq!(member_type(table.population(slot_b).unwrap(), "a"), TypeRef::Slot(slot_a));
    let order: Vec<SlotId> = table.populations.iter().map(|n| n.slot).collect();
    assert_eq!(order, vec![slot_a, slot_b]);
}

#[test]
fn declared_types_populate_before_discovered_ones() {
    let mut b = ProgramBuilder::new();
    let a = b.interface("A");
    let later = b.interface("B");
    let c = b.interface("C");
    let hidden = b.interface("Hidden");
    b.property(a, "c", c);
    b.property(a, "hidden", hidden);
    let file = b.file("order.ts");
    b.declare(&file, a);
    b.declare(&file, later);
    b.declare(&file, c);
    let program = b.build().unwrap();

    let table = run(&program);
    let names: Vec<&str> = table
        .populations
        .iter()
        .filter_map(|n| n.name.as_deref())
        .collect();
    assert_eq!(names, vec!["A", "B", "C", "Hidden"]);
    assert_eq!(table.lookup("order", "C"), Some(SlotId(1)));
    assert_eq!(table.lookup("order", "B"), Some(SlotId(3)));
}

#[test]
fn structurally_equal_instantiations_share_a_slot() {
    let mut b = ProgramBuilder::new();
    let t = b.type_parameter("T", None);
    let boxed = b.class("Box");
    b.type_parameters(boxed, &[t]);
    let first = b.reference(boxed, &[TypeHandle::NUMBER]);
    let second = b.reference(boxed, &[TypeHandle::NUMBER]);
    let strings = b.reference(boxed, &[TypeHandle::STRING]);
    let user = b.class("User");
    b.property(user, "a", first);
    b.property(user, "b", second);
    b.property(user, "c", strings);
    let file = b.file("box.ts");
    b.declare(&file, user);
    let program = b.build().unwrap();

    let table = run(&program);
    let user = node(&table, "box", "User");
    assert_eq!(member_type(user, "a"), member_type(user, "b"));
    assert_ne!(member_type(user, "a"), member_type(user, "c"));
}

#[test]
fn declarations_resolve_to_the_host_type() {
    let mut b = ProgramBuilder::new();
    let a = b.class("A");
    let file = b.file("one.ts");
    let decl = b.declare(&file, a);
    let program = b.build().unwrap();

    assert_eq!(decl, DeclId(0));
    let mut pass = ReflectionPass::new(&program, ReflectOptions::default());
    pass.run(program.files());
    assert_eq!(pass.slot_of(decl), Some(SlotId(0)));
    assert!(pass.diagnostics().is_empty());
}

#[test]
fn class_wins_when_scopes_share_a_package_key() {
    // `x.ts { namespace y { interface Foo } }` and `x/y.ts { class Foo }`
    // both key as `x.y`.
    let mut b = ProgramBuilder::new();
    let interface = b.interface("Foo");
    let class = b.class("Foo");
    let x = b.file("x.ts");
    let y = b.namespace(&x, "y");
    b.declare(&y, interface);
    let xy = b.file("x/y.ts");
    b.declare(&xy, class);
    let program = b.build().unwrap();

    let output = reflect(&program, program.files(), ReflectOptions::default());
    let foo = node(&output.table, "x.y", "Foo");
    assert!(matches!(foo.kind, TypeNodeKind::Class { .. }), "{foo:?}");
    assert_eq!(output.table.packages["x.y"].len(), 1);
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.code == diagnostic_codes::INTERFACE_SHADOWED_BY_CLASS && d.subject == "x.y#Foo")
    );
}

#[test]
fn class_keeps_its_name_against_a_later_interface_in_another_file() {
    let mut b = ProgramBuilder::new();
    let class = b.class("Foo");
    let interface = b.interface("Foo");
    let ts = b.file("shapes.ts");
    b.declare(&ts, class);
    let tsx = b.file("shapes.tsx");
    b.declare(&tsx, interface);
    let program = b.build().unwrap();

    let output = reflect(&program, program.files(), ReflectOptions::default());
    let foo = node(&output.table, "shapes", "Foo");
    assert!(matches!(foo.kind, TypeNodeKind::Class { .. }), "{foo:?}");
    assert_eq!(
        output
            .diagnostics
            .iter()
            .filter(|d| d.code == diagnostic_codes::INTERFACE_SHADOWED_BY_CLASS)
            .count(),
        1
    );
}

#[test]
fn same_kind_entries_merged_under_one_key_keep_the_first() {
    let mut b = ProgramBuilder::new();
    let first = b.class("Foo");
    let second = b.class("Foo");
    b.property(second, "extra", TypeHandle::NUMBER);
    let ts = b.file("shapes.ts");
    b.declare(&ts, first);
    let tsx = b.file("shapes.tsx");
    b.declare(&tsx, second);
    let program = b.build().unwrap();

    let output = reflect(&program, program.files(), ReflectOptions::default());
    let foo = node(&output.table, "shapes", "Foo");
    assert!(foo.kind.body().is_some_and(|body| body.members.is_empty()));
    assert!(
        output
            .diagnostics
            .iter()
            .any(|d| d.code == diagnostic_codes::DUPLICATE_TYPE_DECLARATION && d.subject == "shapes#Foo")
    );
}

#[test]
fn declarations_that_cannot_be_reflected_warn() {
    let json = format!(
        r#"{{
          "types": [ {{ "kind": "literal", "value": "red" }} ],
          "declarations": [10, {number}],
          "files": [
            {{ "fileName": "colors.ts",
               "statements": [
                 {{ "kind": "class", "decl": 0, "name": "Red" }},
                 {{ "kind": "interface", "decl": 1, "name": "Count" }}
               ] }}
          ]
        }}"#,
        number = TypeHandle::NUMBER.0
    );
    let program = Program::from_json(&json).unwrap();

    let output = reflect(&program, program.files(), ReflectOptions::default());
    assert_eq!(output.table.slot_count, 0);
    assert!(output.table.packages["colors"].is_empty());
    let warnings: Vec<(&str, &str)> = output
        .diagnostics
        .iter()
        .filter(|d| d.code == diagnostic_codes::UNREFLECTABLE_DECLARATION && d.is_warning())
        .map(|d| (d.subject.as_str(), d.message_text.as_str()))
        .collect();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].0, "Red");
    assert!(warnings[0].1.contains("literal type '\"red\"'"), "{}", warnings[0].1);
    assert_eq!(warnings[1].0, "Count");
    assert!(warnings[1].1.contains("intrinsic type 'number'"), "{}", warnings[1].1);
}
