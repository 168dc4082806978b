//! Emission writer: turns a finished pass into a [`MetadataTable`].
//!
//! Stages, in output order:
//! 1. slot-count pre-allocation,
//! 2. intrinsic singletons,
//! 3. package -> type name -> slot table (packages depth-first, types in
//!    declaration order),
//! 4. per-slot populations in discovery order.
//!
//! Distinct scopes can land on one package key: `x.ts` with `namespace y`
//! and `x/y.ts` both key as `x.y`, and every scope of a file shares one key
//! in the flat layout. Names merged under a key go through the same
//! collision rules as a single package: the class wins over an interface,
//! and of two same-kind entries the first stays.

mod script;
mod writer;

pub use script::ScriptRenderer;
pub use writer::{NewLine, TextWriter};

use crate::node::{SlotId, TypeNode};
use crate::package::PackageTree;
use crate::table::{MetadataTable, PackageTable};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tsr_common::Diagnostic;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_host::{DeclId, DeclarationKind, IntrinsicKind};

/// How the package table is keyed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageLayout {
    /// One entry per package and namespace: `file1.ns` -> `Inner`.
    #[default]
    Nested,
    /// One entry per file: `file1` -> `ns.Inner`.
    Flat,
}

pub struct EmissionWriter {
    library: String,
    layout: PackageLayout,
}

impl EmissionWriter {
    pub fn new(library: impl Into<String>, layout: PackageLayout) -> Self {
        Self {
            library: library.into(),
            layout,
        }
    }

    pub fn emit(
        &self,
        slot_count: usize,
        tree: &PackageTree,
        declared: &FxHashMap<DeclId, SlotId>,
        populations: Vec<TypeNode>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> MetadataTable {
        debug_assert!(
            populations
                .iter()
                .flat_map(TypeNode::slot_refs)
                .all(|slot| slot.index() < slot_count),
            "population references a slot past the table"
        );
        let packages = self.packages(tree, declared, diagnostics);
        debug!(
            library = %self.library,
            slots = slot_count,
            packages = packages.len(),
            "emitting metadata table"
        );
        MetadataTable {
            library: self.library.clone(),
            slot_count: slot_count as u32,
            intrinsics: IntrinsicKind::ALL.to_vec(),
            packages,
            populations,
        }
    }

    fn packages(
        &self,
        tree: &PackageTree,
        declared: &FxHashMap<DeclId, SlotId>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> IndexMap<String, PackageTable> {
        let mut packages: IndexMap<String, PackageTable> = IndexMap::new();
        let mut kinds: FxHashMap<(String, String), DeclarationKind> = FxHashMap::default();
        for file in tree.files() {
            for id in tree.depth_first(file.root) {
                let node = tree.node(id);
                let (key, flat) = match self.layout {
                    PackageLayout::Nested if node.full_name.is_empty() => {
                        (file.package_name.clone(), false)
                    }
                    PackageLayout::Nested => {
                        (format!("{}.{}", file.package_name, node.full_name), false)
                    }
                    PackageLayout::Flat => (file.package_name.clone(), true),
                };
                let entries = packages.entry(key.clone()).or_default();
                for ((name, kind), decl) in &node.types {
                    let Some(&slot) = declared.get(decl) else {
                        continue;
                    };
                    let name = if flat {
                        node.qualified(name)
                    } else {
                        name.clone()
                    };
                    let merged = (key.clone(), name);
                    match kinds.get(&merged).copied() {
                        None => {
                            entries.insert(merged.1.clone(), slot);
                            kinds.insert(merged, *kind);
                        }
                        Some(DeclarationKind::Interface) if *kind == DeclarationKind::Class => {
                            entries.shift_remove(&merged.1);
                            entries.insert(merged.1.clone(), slot);
                            diagnostics.push(shadowed(&merged.0, &merged.1));
                            kinds.insert(merged, DeclarationKind::Class);
                        }
                        Some(DeclarationKind::Class) if *kind == DeclarationKind::Interface => {
                            diagnostics.push(shadowed(&merged.0, &merged.1));
                        }
                        Some(existing) => {
                            diagnostics.push(Diagnostic::from_message(
                                &diagnostic_messages::DUPLICATE_TYPE_DECLARATION,
                                format!("{}#{}", merged.0, merged.1),
                                &[existing.as_str(), &merged.1, &merged.0],
                            ));
                        }
                    }
                }
            }
        }
        packages
    }
}

fn shadowed(package: &str, name: &str) -> Diagnostic {
    debug!(package, name, "interface shadowed by class across merged scopes");
    Diagnostic::from_message(
        &diagnostic_messages::INTERFACE_SHADOWED_BY_CLASS,
        format!("{package}#{name}"),
        &[name, package],
    )
}
