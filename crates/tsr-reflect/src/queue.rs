//! FIFO of discovered-but-unserialized types.

use crate::node::SlotId;
use std::collections::VecDeque;
use tsr_common::limits;
use tsr_host::TypeHandle;

#[derive(Debug)]
pub struct DiscoveryQueue {
    pending: VecDeque<(TypeHandle, SlotId)>,
    /// Entries ever pushed, for pass statistics.
    pushed: usize,
}

impl DiscoveryQueue {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(limits::INITIAL_QUEUE_CAPACITY),
            pushed: 0,
        }
    }

    pub fn push(&mut self, handle: TypeHandle, slot: SlotId) {
        self.pushed += 1;
        self.pending.push_back((handle, slot));
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = (TypeHandle, SlotId)>) {
        for (handle, slot) in entries {
            self.push(handle, slot);
        }
    }

    pub fn pop(&mut self) -> Option<(TypeHandle, SlotId)> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub const fn total_pushed(&self) -> usize {
        self.pushed
    }
}

impl Default for DiscoveryQueue {
    fn default() -> Self {
        Self::new()
    }
}
