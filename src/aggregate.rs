//! Thread-safe grouping of targets by favicon hash.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::HashGroup;
use crate::target::Target;

#[derive(Debug, Default)]
struct Groups {
    ordered: Vec<HashGroup>,
    index: HashMap<i32, usize>,
}

/// Multimap from hash to the targets that produced it.
///
/// Safe to share between tasks. Groups are append-only and iterate in the
/// order their hash was first seen; members keep their insertion order.
#[derive(Debug, Default)]
pub struct Aggregator {
    inner: Mutex<Groups>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave Groups half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Groups> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `target` to the group for `hash`, creating the group if absent.
    pub fn insert(&self, target: Target, hash: i32) {
        let mut groups = self.lock();
        let Groups { ordered, index } = &mut *groups;
        match index.get(&hash) {
            Some(&slot) => ordered[slot].members.push(target),
            None => {
                index.insert(hash, ordered.len());
                ordered.push(HashGroup {
                    hash,
                    members: vec![target],
                });
            }
        }
    }

    /// Snapshot of all groups in first-seen order.
    pub fn groups(&self) -> Vec<HashGroup> {
        self.lock().ordered.clone()
    }

    /// Consumes the aggregator, returning its groups without copying.
    pub fn into_groups(self) -> Vec<HashGroup> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .ordered
    }
}
