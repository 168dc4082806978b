//! Package/namespace tree.
//!
//! Every source file contributes a root package named after its path; each
//! `namespace` nests a child package. Packages record the class and interface
//! declarations that are addressable by name from the runtime.
//!
//! The builder walks statements in three states:
//!
//! - at a file root: namespaces open children, declarations register,
//! - inside a namespace: same rules, one level deeper,
//! - at a declaration of interest (class or interface): the `(name, kind)`
//!   pair goes through the collision table and the walk does not descend.
//!
//! Collision table rules:
//!
//! - the same `(name, kind)` twice: the first declaration stays registered;
//! - a class arriving after an interface of the same name evicts the
//!   interface entry;
//! - an interface arriving after a class of the same name is not registered.

use indexmap::IndexMap;
use std::path::{Component, Path};
use tracing::debug;
use tsr_common::Diagnostic;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_common::safe_identifier;
use tsr_host::{DeclId, DeclarationKind, SourceFile, Statement};

/// Index of a package in a [`PackageTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackageId(pub u32);

impl PackageId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageNode {
    /// `None` for a file root.
    pub name: Option<String>,
    /// Dotted namespace path below the file root; empty for the root.
    pub full_name: String,
    /// Enclosing package, for path reconstruction only.
    pub parent: Option<PackageId>,
    pub children: IndexMap<String, PackageId>,
    pub types: IndexMap<(String, DeclarationKind), DeclId>,
}

impl PackageNode {
    fn root() -> Self {
        Self {
            name: None,
            full_name: String::new(),
            parent: None,
            children: IndexMap::new(),
            types: IndexMap::new(),
        }
    }

    /// Name table key for `type_name` relative to the file root.
    pub fn qualified(&self, type_name: &str) -> String {
        if self.full_name.is_empty() {
            type_name.to_string()
        } else {
            format!("{}.{type_name}", self.full_name)
        }
    }
}

/// One source file's root package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePackage {
    /// Dotted path-derived name, e.g. `src.models.user`.
    pub package_name: String,
    pub root: PackageId,
}

#[derive(Debug, Default)]
pub struct PackageTree {
    nodes: Vec<PackageNode>,
    files: Vec<FilePackage>,
}

impl PackageTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: PackageId) -> &PackageNode {
        &self.nodes[id.index()]
    }

    pub fn files(&self) -> &[FilePackage] {
        &self.files
    }

    /// Namespace names from the file root down to `id`.
    pub fn path(&self, id: PackageId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.node(id);
            path.extend(node.name.as_deref());
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// `root` and its descendants, pre-order, children in declaration order.
    pub fn depth_first(&self, root: PackageId) -> Vec<PackageId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.values().rev().copied());
        }
        order
    }

    fn push(&mut self, node: PackageNode) -> PackageId {
        self.nodes.push(node);
        PackageId(self.nodes.len() as u32 - 1)
    }

    fn child(&mut self, parent: PackageId, name: &str) -> PackageId {
        if let Some(&existing) = self.node(parent).children.get(name) {
            // `namespace N {}` declared twice merges into one package.
            return existing;
        }
        let full_name = self.node(parent).qualified(name);
        let id = self.push(PackageNode {
            name: Some(name.to_string()),
            full_name,
            parent: Some(parent),
            children: IndexMap::new(),
            types: IndexMap::new(),
        });
        self.nodes[parent.index()]
            .children
            .insert(name.to_string(), id);
        id
    }
}

/// Root package name for a file: its path below `root_dir`, extension
/// removed, components joined with `.`. Components are kept as written;
/// only namespace names are made safe identifiers.
pub fn package_name(file_name: &str, root_dir: Option<&Path>) -> String {
    let path = Path::new(file_name);
    let relative = root_dir
        .and_then(|root| path.strip_prefix(root).ok())
        .unwrap_or(path);
    let relative = relative.with_extension("");
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Walks source files into a [`PackageTree`].
pub struct TreeBuilder<'a> {
    tree: &'a mut PackageTree,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(tree: &'a mut PackageTree, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self { tree, diagnostics }
    }

    /// Add one file. Declaration files contribute nothing.
    pub fn add_file(&mut self, file: &SourceFile, root_dir: Option<&Path>) -> Option<PackageId> {
        if file.is_declaration_file {
            debug!(file = %file.file_name, "skipping declaration file");
            return None;
        }
        let package_name = package_name(&file.file_name, root_dir);
        let root = self.tree.push(PackageNode::root());
        self.tree.files.push(FilePackage {
            package_name: package_name.clone(),
            root,
        });
        debug!(file = %file.file_name, package = %package_name, "building package tree");
        self.scan(root, &package_name, &file.statements);
        Some(root)
    }

    fn scan(&mut self, package: PackageId, label: &str, statements: &[Statement]) {
        for statement in statements {
            match statement {
                Statement::Namespace { name, statements } => {
                    let name = safe_identifier(name);
                    let child = self.tree.child(package, &name);
                    let label = format!("{label}.{name}");
                    self.scan(child, &label, statements);
                }
                Statement::Class { decl, name } => {
                    self.register(package, label, name.as_deref(), DeclarationKind::Class, *decl);
                }
                Statement::Interface { decl, name } => {
                    self.register(
                        package,
                        label,
                        name.as_deref(),
                        DeclarationKind::Interface,
                        *decl,
                    );
                }
                Statement::TypeAlias { .. } | Statement::Other => {}
            }
        }
    }

    fn register(
        &mut self,
        package: PackageId,
        label: &str,
        name: Option<&str>,
        kind: DeclarationKind,
        decl: DeclId,
    ) {
        let Some(name) = name else {
            self.diagnostics.push(Diagnostic::from_message(
                &diagnostic_messages::UNNAMED_TYPE_DECLARATION,
                label,
                &[kind.as_str(), label],
            ));
            return;
        };
        let types = &mut self.tree.nodes[package.index()].types;
        let key = (name.to_string(), kind);

        if types.contains_key(&key) {
            self.diagnostics.push(Diagnostic::from_message(
                &diagnostic_messages::DUPLICATE_TYPE_DECLARATION,
                format!("{label}#{name}"),
                &[kind.as_str(), name, label],
            ));
            return;
        }

        match kind {
            DeclarationKind::Class => {
                let interface = (name.to_string(), DeclarationKind::Interface);
                if types.shift_remove(&interface).is_some() {
                    self.shadowed(label, name);
                }
            }
            DeclarationKind::Interface => {
                let class = (name.to_string(), DeclarationKind::Class);
                if types.contains_key(&class) {
                    self.shadowed(label, name);
                    return;
                }
            }
        }
        self.tree.nodes[package.index()].types.insert(key, decl);
    }

    fn shadowed(&mut self, label: &str, name: &str) {
        debug!(package = %label, name, "interface shadowed by class");
        self.diagnostics.push(Diagnostic::from_message(
            &diagnostic_messages::INTERFACE_SHADOWED_BY_CLASS,
            format!("{label}#{name}"),
            &[name, label],
        ));
    }
}

#[cfg(test)]
#[path = "../tests/package_tests.rs"]
mod package_tests;
