use super::*;
use tsr_common::diagnostics::diagnostic_codes;
use tsr_host::{Program, ProgramBuilder};

fn build_tree(program: &Program) -> (PackageTree, Vec<PackageId>, Vec<Diagnostic>) {
    let mut tree = PackageTree::new();
    let mut diagnostics = Vec::new();
    let roots = {
        let mut builder = TreeBuilder::new(&mut tree, &mut diagnostics);
        program
            .files()
            .iter()
            .filter_map(|file| builder.add_file(file, None))
            .collect()
    };
    (tree, roots, diagnostics)
}

fn type_keys(node: &PackageNode) -> Vec<(String, DeclarationKind)> {
    node.types.keys().cloned().collect()
}

#[test]
fn package_names_follow_the_relative_path() {
    assert_eq!(
        package_name("src/models/user.ts", Some(Path::new("src"))),
        "models.user"
    );
    assert_eq!(package_name("./a/b.tsx", None), "a.b");
    assert_eq!(package_name("file1.ts", None), "file1");
    assert_eq!(package_name("lib/my-file.ts", Some(Path::new("other"))), "lib.my-file");
    assert_eq!(package_name("2d/shapes.ts", None), "2d.shapes");
    assert_eq!(package_name("a.b.ts", None), "a.b");
}

#[test]
fn namespace_names_are_sanitized_but_file_names_are_not() {
    let mut b = ProgramBuilder::new();
    let file = b.file("my-file.ts");
    let ns = b.namespace(&file, "my-ns");
    let point = b.class("Point");
    b.declare(&ns, point);
    let program = b.build().unwrap();

    let (tree, _, _) = build_tree(&program);
    let [file] = tree.files() else {
        panic!("expected one file");
    };
    assert_eq!(file.package_name, "my-file");
    let child = tree.node(file.root).children["my_ns"];
    assert_eq!(tree.node(child).full_name, "my_ns");
}

#[test]
fn namespaces_open_child_packages() {
    let mut b = ProgramBuilder::new();
    let file = b.file("file1.ts");
    let outer = b.namespace(&file, "outer");
    let inner = b.namespace(&outer, "inner");
    let top = b.class("Top");
    let deep = b.interface("Deep");
    b.declare(&file, top);
    b.declare(&inner, deep);
    let program = b.build().unwrap();

    let (tree, roots, diagnostics) = build_tree(&program);
    assert!(diagnostics.is_empty());
    assert_eq!(tree.files()[0].package_name, "file1");

    let order = tree.depth_first(roots[0]);
    assert_eq!(order.len(), 3);
    let deepest = tree.node(order[2]);
    assert_eq!(deepest.full_name, "outer.inner");
    assert_eq!(tree.path(order[2]), vec!["outer", "inner"]);
    assert_eq!(deepest.qualified("Deep"), "outer.inner.Deep");
    assert_eq!(
        type_keys(deepest),
        vec![("Deep".to_string(), DeclarationKind::Interface)]
    );
    assert_eq!(tree.node(roots[0]).name, None);
}

#[test]
fn class_evicts_an_earlier_interface() {
    let mut b = ProgramBuilder::new();
    let file = b.file("scope.ts");
    let interface = b.interface("Foo");
    let other = b.interface("Other");
    let class = b.class("Foo");
    b.declare(&file, interface);
    b.declare(&file, other);
    b.declare(&file, class);
    let program = b.build().unwrap();

    let (tree, roots, diagnostics) = build_tree(&program);
    assert_eq!(
        type_keys(tree.node(roots[0])),
        vec![
            ("Other".to_string(), DeclarationKind::Interface),
            ("Foo".to_string(), DeclarationKind::Class),
        ]
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::INTERFACE_SHADOWED_BY_CLASS);
    assert_eq!(diagnostics[0].subject, "scope#Foo");
}

#[test]
fn interface_after_class_is_not_registered() {
    let mut b = ProgramBuilder::new();
    let file = b.file("scope.ts");
    let class = b.class("Foo");
    let interface = b.interface("Foo");
    b.declare(&file, class);
    b.declare(&file, interface);
    let program = b.build().unwrap();

    let (tree, roots, diagnostics) = build_tree(&program);
    assert_eq!(
        type_keys(tree.node(roots[0])),
        vec![("Foo".to_string(), DeclarationKind::Class)]
    );
    assert_eq!(diagnostics[0].code, diagnostic_codes::INTERFACE_SHADOWED_BY_CLASS);
}

#[test]
fn duplicate_declarations_keep_the_first() {
    let mut b = ProgramBuilder::new();
    let file = b.file("dup.ts");
    let first = b.interface("Twice");
    let second = b.interface("Twice");
    let first_decl = b.declare(&file, first);
    b.declare(&file, second);
    let program = b.build().unwrap();

    let (tree, roots, diagnostics) = build_tree(&program);
    let node = tree.node(roots[0]);
    assert_eq!(node.types.len(), 1);
    assert_eq!(
        node.types[&("Twice".to_string(), DeclarationKind::Interface)],
        first_decl
    );
    assert_eq!(diagnostics[0].code, diagnostic_codes::DUPLICATE_TYPE_DECLARATION);
}

#[test]
fn reopened_namespaces_merge() {
    let mut b = ProgramBuilder::new();
    let file = b.file("merge.ts");
    let first = b.namespace(&file, "ns");
    let a = b.class("A");
    b.declare(&first, a);
    b.other(&file);
    let second = b.namespace(&file, "ns");
    let c = b.class("C");
    b.declare(&second, c);
    let program = b.build().unwrap();

    let (tree, roots, _) = build_tree(&program);
    let root = tree.node(roots[0]);
    assert_eq!(root.children.len(), 1);
    let ns = tree.node(root.children["ns"]);
    assert_eq!(ns.types.len(), 2);
}

#[test]
fn namespace_names_are_made_safe() {
    let mut b = ProgramBuilder::new();
    let file = b.file("file1.ts");
    b.namespace(&file, "my-ns");
    let program = b.build().unwrap();

    let (tree, roots, _) = build_tree(&program);
    assert!(tree.node(roots[0]).children.contains_key("my_ns"));
}

#[test]
fn unnamed_classes_and_declaration_files_are_skipped() {
    let mut b = ProgramBuilder::new();
    let file = b.file("anon.ts");
    let class = b.class("default");
    b.declare_unnamed_class(&file, class);
    let ambient = b.file("lib.d.ts");
    let global = b.interface("Global");
    b.declare(&ambient, global);
    let program = b.build().unwrap();

    let (tree, roots, diagnostics) = build_tree(&program);
    assert_eq!(roots.len(), 1);
    assert_eq!(tree.files().len(), 1);
    assert!(tree.node(roots[0]).types.is_empty());
    assert_eq!(diagnostics[0].code, diagnostic_codes::UNNAMED_TYPE_DECLARATION);
}

#[test]
fn type_aliases_do_not_register_names() {
    let mut b = ProgramBuilder::new();
    let file = b.file("alias.ts");
    let shape = b.type_literal(Some("Shape"));
    b.declare(&file, shape);
    let program = b.build().unwrap();

    let (tree, roots, diagnostics) = build_tree(&program);
    assert!(tree.node(roots[0]).types.is_empty());
    assert!(diagnostics.is_empty());
}
