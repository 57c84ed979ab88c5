//! Request tickets
//!
//! Every request that writes into the mirror takes a ticket first. When the
//! response arrives it is applied only if its ticket is still the newest one
//! for the same target, so a slow response can never overwrite the result
//! of a request issued after it.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
pub(crate) struct Tickets<K> {
    next: u64,
    /// Newest collection load; 0 when none may apply
    load: u64,
    keys: HashMap<K, u64>,
}

impl<K: Eq + Hash> Tickets<K> {
    pub(crate) fn new() -> Self {
        Self {
            next: 0,
            load: 0,
            keys: HashMap::new(),
        }
    }

    fn issue(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    pub(crate) fn begin_load(&mut self) -> u64 {
        let ticket = self.issue();
        self.load = ticket;
        ticket
    }

    pub(crate) fn is_current_load(&self, ticket: u64) -> bool {
        self.load == ticket
    }

    /// A mutation just changed the mirror; loads already in flight may
    /// predate it on the server.
    pub(crate) fn invalidate_loads(&mut self) {
        self.load = 0;
    }

    pub(crate) fn begin(&mut self, key: K) -> u64 {
        let ticket = self.issue();
        self.keys.insert(key, ticket);
        ticket
    }

    /// Returns whether `ticket` was still the newest for `key`. A newer
    /// ticket is left in place.
    pub(crate) fn finish(&mut self, key: &K, ticket: u64) -> bool {
        if self.keys.get(key) == Some(&ticket) {
            self.keys.remove(key);
            true
        } else {
            false
        }
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.keys.len()
    }
}
