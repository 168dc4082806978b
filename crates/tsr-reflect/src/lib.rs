//! Type-graph discovery and reflection metadata emission.
//!
//! A [`ReflectionPass`] walks a checked program's declarations through a
//! [`tsr_host::TypeHost`], gives every reachable type a stable slot, and emits
//! a [`MetadataTable`]:
//!
//! - **Identity**: [`IdentityRegistry`] maps canonical host handles to slots.
//!   It is the only place a slot is created, so a type reached along many
//!   paths is emitted once.
//! - **Discovery**: serializers never recurse. A child seen for the first
//!   time gets a slot and goes on the [`DiscoveryQueue`]; cycles close
//!   through slot references.
//! - **Emission**: slots are pre-allocated before any is populated, so a
//!   loader can resolve references to slots populated later in the table.

mod classify;
pub mod emit;
pub mod identity;
pub mod node;
pub mod package;
pub mod pass;
pub mod queue;
mod serialize;
pub mod table;

pub use classify::{ANONYMOUS_CLASS, ANONYMOUS_FUNCTION, ANONYMOUS_INTERFACE, ANONYMOUS_TYPE};
pub use emit::{EmissionWriter, NewLine, PackageLayout, ScriptRenderer};
pub use identity::{Allocation, IdentityRegistry, ReflectionInfo, ShapeKind};
pub use node::{
    Member, ObjectBody, Parameter, Signature, SlotId, TypeNode, TypeNodeKind, TypeRef,
};
pub use package::{FilePackage, PackageId, PackageNode, PackageTree, TreeBuilder, package_name};
pub use pass::{DEFAULT_LIBRARY, ReflectOptions, ReflectionOutput, ReflectionPass, reflect};
pub use queue::DiscoveryQueue;
pub use table::{MetadataTable, PackageTable};
