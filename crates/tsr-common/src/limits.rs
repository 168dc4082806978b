//! Centralized limits for the reflection pass.
//!
//! The discovery pass is bounded by the size of the checked type graph, so
//! these are capacity hints and hard caps on emitted table sizes rather than
//! recursion guards.

/// Maximum number of slots a single metadata table may allocate.
///
/// The runtime loader pre-allocates every slot a table declares, so tables
/// declaring more than this are rejected before any allocation happens.
pub const MAX_SLOTS: u32 = 1 << 24;

/// Initial capacity for the per-pass slot arena.
pub const INITIAL_SLOT_CAPACITY: usize = 64;

/// Initial capacity for the discovery queue.
pub const INITIAL_QUEUE_CAPACITY: usize = 32;
