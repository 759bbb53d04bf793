//! Shared first-reporter-wins filter for one search operation

use std::collections::HashSet;
use std::sync::Mutex;

use super::item::DedupKey;

#[derive(Debug, Default)]
pub struct SeenItems {
    seen: Mutex<HashSet<DedupKey>>,
}

impl SeenItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key`; false if some unit already reported it
    ///
    /// The lock covers only the insert, never the matching work.
    pub fn try_add(&self, key: DedupKey) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().map(|seen| seen.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
