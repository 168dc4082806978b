//! One reflection pass over a checked program.

use crate::classify::{Classified, classify};
use crate::emit::{EmissionWriter, PackageLayout};
use crate::identity::IdentityRegistry;
use crate::node::{SlotId, TypeNode};
use crate::package::{PackageTree, TreeBuilder};
use crate::queue::DiscoveryQueue;
use crate::serialize::TypeSerializer;
use crate::table::MetadataTable;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use tracing::{debug, trace, warn};
use tsr_common::Diagnostic;
use tsr_common::diagnostics::diagnostic_messages;
use tsr_host::{DeclId, SourceFile, TypeHost};

pub const DEFAULT_LIBRARY: &str = "default";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectOptions {
    /// Key the table is published under at run time.
    pub library_name: String,
    pub package_layout: PackageLayout,
    /// Package names are file paths relative to this directory.
    pub root_dir: Option<PathBuf>,
}

impl Default for ReflectOptions {
    fn default() -> Self {
        Self {
            library_name: DEFAULT_LIBRARY.to_string(),
            package_layout: PackageLayout::default(),
            root_dir: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReflectionOutput {
    pub table: MetadataTable,
    /// Non-fatal diagnostics, in the order they were raised.
    pub diagnostics: Vec<Diagnostic>,
}

/// Owns the registry, queue and node arena for one compilation.
///
/// Declared types are serialized as soon as the package walk reaches them;
/// everything they reference is queued and drained afterwards. Population
/// order is therefore declared types in declaration order, then discovered
/// types in first-reference order.
pub struct ReflectionPass<'h, H: TypeHost + ?Sized> {
    host: &'h H,
    options: ReflectOptions,
    registry: IdentityRegistry,
    queue: DiscoveryQueue,
    /// Indexed by slot; `None` until populated.
    nodes: Vec<Option<TypeNode>>,
    order: Vec<SlotId>,
    tree: PackageTree,
    declared: FxHashMap<DeclId, SlotId>,
    diagnostics: Vec<Diagnostic>,
}

impl<'h, H: TypeHost + ?Sized> ReflectionPass<'h, H> {
    pub fn new(host: &'h H, options: ReflectOptions) -> Self {
        Self {
            host,
            options,
            registry: IdentityRegistry::new(),
            queue: DiscoveryQueue::new(),
            nodes: Vec::new(),
            order: Vec::new(),
            tree: PackageTree::new(),
            declared: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Declared pass over `files`, then drain the queue.
    pub fn run(&mut self, files: &[SourceFile]) {
        let mut roots = Vec::with_capacity(files.len());
        {
            let mut builder = TreeBuilder::new(&mut self.tree, &mut self.diagnostics);
            for file in files {
                roots.extend(builder.add_file(file, self.options.root_dir.as_deref()));
            }
        }

        let declarations: Vec<(DeclId, String)> = roots
            .iter()
            .flat_map(|&root| self.tree.depth_first(root))
            .flat_map(|id| {
                self.tree
                    .node(id)
                    .types
                    .iter()
                    .map(|((name, _), &decl)| (decl, name.clone()))
            })
            .collect();
        debug!(
            files = files.len(),
            declarations = declarations.len(),
            "declared pass"
        );
        for (decl, name) in declarations {
            self.declare(decl, name);
        }

        debug!(queued = self.queue.len(), "draining discovery queue");
        self.drain();
        debug!(
            slots = self.registry.len(),
            enqueued = self.queue.total_pushed(),
            "discovery complete"
        );
    }

    fn declare(&mut self, decl: DeclId, name: String) {
        let ty = self.host.resolve_type(decl);
        let (handle, shape) = match classify(self.host, ty) {
            Classified::Shape { handle, shape, .. } => (handle, shape),
            Classified::Intrinsic(kind) => {
                self.unreflectable(&name, &format!("intrinsic type '{kind}'"));
                return;
            }
            Classified::Unsupported(reason) => {
                self.unreflectable(&name, &reason.describe());
                return;
            }
        };
        let allocation = self.registry.identity_of(handle, || (Some(name), shape));
        self.declared.insert(decl, allocation.slot);
        // Possibly already discovered by reference, but not populated yet.
        if !self.is_populated(allocation.slot) {
            self.populate(allocation.slot);
        }
    }

    fn unreflectable(&mut self, name: &str, what: &str) {
        let diagnostic = Diagnostic::from_message(
            &diagnostic_messages::UNREFLECTABLE_DECLARATION,
            name,
            &[name, what],
        );
        warn!(code = diagnostic.code, subject = %name, "{}", diagnostic.message_text);
        self.diagnostics.push(diagnostic);
    }

    fn drain(&mut self) {
        while let Some((handle, slot)) = self.queue.pop() {
            if self.is_populated(slot) {
                trace!(slot = slot.0, handle = handle.0, "already populated");
                continue;
            }
            self.populate(slot);
        }
    }

    fn is_populated(&self, slot: SlotId) -> bool {
        self.nodes.get(slot.index()).is_some_and(Option::is_some)
    }

    fn populate(&mut self, slot: SlotId) {
        let serializer = TypeSerializer::new(self.host, &mut self.registry, &mut self.diagnostics);
        let Some(serialized) = serializer.serialize(slot) else {
            return;
        };
        if self.nodes.len() < self.registry.len() {
            self.nodes.resize(self.registry.len(), None);
        }
        self.nodes[slot.index()] = Some(serialized.node);
        self.order.push(slot);
        self.queue.extend(serialized.discovered);
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &DiscoveryQueue {
        &self.queue
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Slot a declaration was registered under.
    pub fn slot_of(&self, decl: DeclId) -> Option<SlotId> {
        self.declared.get(&decl).copied()
    }

    /// Emit the table. Consumes the pass, ending the registry's lifetime.
    pub fn finish(mut self) -> ReflectionOutput {
        let populations: Vec<TypeNode> = self
            .order
            .iter()
            .filter_map(|slot| self.nodes[slot.index()].take())
            .collect();
        debug_assert_eq!(populations.len(), self.registry.len());
        let writer = EmissionWriter::new(
            self.options.library_name.clone(),
            self.options.package_layout,
        );
        let table = writer.emit(
            self.registry.len(),
            &self.tree,
            &self.declared,
            populations,
            &mut self.diagnostics,
        );
        ReflectionOutput {
            table,
            diagnostics: self.diagnostics,
        }
    }
}

/// Run a full pass over `files`.
pub fn reflect<H: TypeHost + ?Sized>(
    host: &H,
    files: &[SourceFile],
    options: ReflectOptions,
) -> ReflectionOutput {
    let mut pass = ReflectionPass::new(host, options);
    pass.run(files);
    pass.finish()
}
