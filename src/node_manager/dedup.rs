//! The fixed-size dedup history for multi-node fan-in.
//!
//! Subscribing to several nodes of one chain delivers every transaction
//! once per node; the history keeps the identities of the last reports and
//! suppresses repeats. Membership checks and insertion happen under one
//! lock so two nodes racing on the same transaction cannot both pass.

use std::collections::{HashSet, VecDeque};

/// How many report identities the history remembers.
pub const DEDUP_CAPACITY: usize = 100;

/// A FIFO membership window over report identities.
pub struct DedupQueue {
    capacity: usize,
    order: VecDeque<String>,
    seen: HashSet<String>,
}

impl DedupQueue {
    /// Creates a history remembering the last `capacity` identities.
    pub fn new(capacity: usize) -> Self {
        Self { capacity, order: VecDeque::with_capacity(capacity), seen: HashSet::new() }
    }

    /// Returns true and records the identity if it is new; returns false for
    /// an identity still inside the window. The oldest identity falls out
    /// once the window is full.
    pub fn check_and_insert(&mut self, identity: &str) -> bool {
        if self.seen.contains(identity) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.order.push_back(identity.to_string());
        self.seen.insert(identity.to_string());
        true
    }

    /// Current number of remembered identities.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for DedupQueue {
    fn default() -> Self {
        Self::new(DEDUP_CAPACITY)
    }
}
