//! Loading programs from their JSON form.

use tsr_host::{
    DeclId, HeritageKind, IntrinsicKind, Program, ProgramBuilder, ProgramError, SignatureInfo,
    Statement, TypeHandle, TypeHost, TypeKind,
};

const SAMPLE: &str = r#"{
  "types": [
    { "kind": "interface", "name": "Named",
      "members": [ { "name": "name", "type": 1 } ] },
    { "kind": "class", "name": "Person",
      "members": [ { "name": "age", "type": 2, "optional": true } ],
      "implements": [10] }
  ],
  "declarations": [10, 11],
  "files": [
    { "fileName": "src/people.ts",
      "statements": [
        { "kind": "interface", "decl": 0, "name": "Named" },
        { "kind": "namespace", "name": "inner",
          "statements": [ { "kind": "class", "decl": 1, "name": "Person" } ] },
        { "kind": "other" }
      ] }
  ]
}"#;

#[test]
fn json_types_start_after_the_intrinsics() {
    let program = Program::from_json(SAMPLE).unwrap();
    let named = program.resolve_type(DeclId(0));
    let person = program.resolve_type(DeclId(1));

    assert_eq!(named, TypeHandle(10));
    assert_eq!(
        program.kind_of(person),
        TypeKind::Class {
            name: Some("Person".to_string())
        }
    );
    assert_eq!(program.heritage_of(person, HeritageKind::Implements), vec![named]);
    assert!(program.members_of(person)[0].optional);
}

#[test]
fn json_statements_nest_namespaces() {
    let program = Program::from_json(SAMPLE).unwrap();
    let file = &program.files()[0];
    assert_eq!(file.statements.len(), 3);
    match &file.statements[1] {
        Statement::Namespace { name, statements } => {
            assert_eq!(name, "inner");
            assert_eq!(statements.len(), 1);
        }
        other => panic!("expected namespace, got {other:?}"),
    }
}

#[test]
fn built_programs_survive_a_json_trip() {
    let mut b = ProgramBuilder::new();
    let shape = b.interface("Shape");
    b.method(
        shape,
        "area",
        vec![SignatureInfo::new(TypeHandle::NUMBER)],
    );
    let list = b.array_of(shape);
    let scope = b.file("shapes.ts");
    b.declare(&scope, shape);
    b.declare_alias(&scope, "Shapes", list);
    let program = b.build().unwrap();

    let text = program.to_json().unwrap();
    let reloaded = Program::from_json(&text).unwrap();
    assert_eq!(reloaded.type_count(), program.type_count());
    assert_eq!(reloaded.files(), program.files());
    assert!(reloaded.is_array_like(reference_target(&reloaded, list)));
}

fn reference_target(program: &Program, list: TypeHandle) -> TypeHandle {
    match program.kind_of(list) {
        TypeKind::Reference { target, .. } => target,
        other => panic!("expected reference, got {other:?}"),
    }
}

#[test]
fn dangling_json_is_an_error() {
    let text = r#"{ "types": [ { "kind": "union", "types": [1, 42] } ] }"#;
    let err = Program::from_json(text).unwrap_err();
    assert!(matches!(err, ProgramError::Json(_)));
    assert!(err.to_string().contains("unknown type #42"));
}

#[test]
fn intrinsic_entries_fold_into_the_reserved_handles() {
    let text = r#"{ "types": [ { "kind": "intrinsic", "intrinsic": "string" } ] }"#;
    let program = Program::from_json(text).unwrap();
    assert_eq!(program.canonical(TypeHandle(10)), IntrinsicKind::String.handle());
}
