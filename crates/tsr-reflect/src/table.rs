//! The emitted metadata table.
//!
//! Field order is load order: allocate `slot_count` empty slots, bind the
//! intrinsic singletons, index packages, then apply `populations` in order.
//! A population may reference any slot below `slot_count`, including ones
//! populated later.

use crate::node::{SlotId, TypeNode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tsr_host::IntrinsicKind;

/// Type name (or `ns.Name` in the flat layout) to slot.
pub type PackageTable = IndexMap<String, SlotId>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataTable {
    pub library: String,
    pub slot_count: u32,
    pub intrinsics: Vec<IntrinsicKind>,
    pub packages: IndexMap<String, PackageTable>,
    pub populations: Vec<TypeNode>,
}

impl MetadataTable {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Slot registered as `package#name`.
    pub fn lookup(&self, package: &str, name: &str) -> Option<SlotId> {
        self.packages.get(package)?.get(name).copied()
    }

    pub fn population(&self, slot: SlotId) -> Option<&TypeNode> {
        self.populations.iter().find(|node| node.slot == slot)
    }
}
