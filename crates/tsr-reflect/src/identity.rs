//! Identity registry: the single point where a type becomes a slot.

use crate::node::SlotId;
use rustc_hash::FxHashMap;
use tracing::trace;
use tsr_common::limits;
use tsr_host::TypeHandle;

/// What a slot will be serialized as, decided when the slot is allocated.
///
/// Only kinds that own a slot appear here; intrinsics and unsupported
/// constructs never reach the registry, so serializers match exhaustively
/// over this set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Class,
    Interface,
    TypeLiteral,
    Function,
    Array {
        element: TypeHandle,
    },
    Reference {
        target: TypeHandle,
        type_arguments: Vec<TypeHandle>,
    },
    Union(Vec<TypeHandle>),
    Intersection(Vec<TypeHandle>),
    Tuple(Vec<TypeHandle>),
    TypeParameter {
        constraint: Option<TypeHandle>,
    },
    /// Named class expression wrapping its instance class.
    Expression {
        class: TypeHandle,
    },
}

/// Information attached to a discovered type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectionInfo {
    pub slot: SlotId,
    /// Canonical handle the slot was allocated for.
    pub handle: TypeHandle,
    pub name: Option<String>,
    pub shape: ShapeKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub slot: SlotId,
    /// First sight of the type: the caller must see it serialized.
    pub fresh: bool,
}

/// Maps canonical host handles to slots, allocating `0, 1, 2, ...` in order
/// of first sight. Scoped to one pass.
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    slots: FxHashMap<TypeHandle, SlotId>,
    infos: Vec<ReflectionInfo>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self {
            slots: FxHashMap::default(),
            infos: Vec::with_capacity(limits::INITIAL_SLOT_CAPACITY),
        }
    }

    /// Slot for `handle`, allocating one on first sight.
    ///
    /// `describe` runs only for fresh allocations. `handle` must already be
    /// canonical.
    pub fn identity_of(
        &mut self,
        handle: TypeHandle,
        describe: impl FnOnce() -> (Option<String>, ShapeKind),
    ) -> Allocation {
        if let Some(&slot) = self.slots.get(&handle) {
            return Allocation { slot, fresh: false };
        }
        let slot = SlotId(self.infos.len() as u32);
        let (name, shape) = describe();
        trace!(slot = slot.0, handle = handle.0, name = ?name, "allocated slot");
        self.slots.insert(handle, slot);
        self.infos.push(ReflectionInfo {
            slot,
            handle,
            name,
            shape,
        });
        Allocation { slot, fresh: true }
    }

    pub fn lookup(&self, handle: TypeHandle) -> Option<SlotId> {
        self.slots.get(&handle).copied()
    }

    pub fn info(&self, slot: SlotId) -> Option<&ReflectionInfo> {
        self.infos.get(slot.index())
    }

    /// Number of slots allocated so far.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/identity_tests.rs"]
mod identity_tests;
