//! A reader/writer lock manager. Every statement currently runs against
//! the single process-wide `Engine` serially, so nothing here is on the
//! query path yet; it's kept as a standalone, tested module for a future
//! finer-grained locking scheme.
//!
//! One reader count plus one writer slot per resource id, guarded by a
//! condition variable so waiters block instead of spinning.

use std::collections::HashMap;
use std::sync::{Condvar, Mutex};

#[derive(Default)]
struct ResourceLock {
    readers: u32,
    writer: Option<u64>,
}

pub struct LockManager {
    locks: Mutex<HashMap<String, ResourceLock>>,
    condition: Condvar,
}

impl LockManager {
    pub fn new() -> Self {
        LockManager {
            locks: Mutex::new(HashMap::new()),
            condition: Condvar::new(),
        }
    }

    pub fn acquire_read(&self, resource_id: &str, txn_id: u64) {
        let mut locks = self.locks.lock().unwrap();
        loop {
            let entry = locks.entry(resource_id.to_string()).or_default();
            if matches!(entry.writer, None | Some(w) if w == txn_id) {
                entry.readers += 1;
                return;
            }
            locks = self.condition.wait(locks).unwrap();
        }
    }

    pub fn release_read(&self, resource_id: &str) {
        let mut locks = self.locks.lock().unwrap();
        if let Some(entry) = locks.get_mut(resource_id) {
            entry.readers = entry.readers.saturating_sub(1);
            if entry.readers == 0 {
                self.condition.notify_all();
            }
        }
    }

    pub fn acquire_write(&self, resource_id: &str, txn_id: u64) {
        let mut locks = self.locks.lock().unwrap();
        loop {
            let entry = locks.entry(resource_id.to_string()).or_default();
            let writer_free = matches!(entry.writer, None | Some(w) if w == txn_id);
            if writer_free && entry.readers == 0 {
                entry.writer = Some(txn_id);
                return;
            }
            locks = self.condition.wait(locks).unwrap();
        }
    }

    pub fn release_write(&self, resource_id: &str) {
        let mut locks = self.locks.lock().unwrap();
        if let Some(entry) = locks.get_mut(resource_id) {
            entry.writer = None;
        }
        self.condition.notify_all();
    }
}

impl Default for LockManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_reads_are_both_granted() {
        let lm = LockManager::new();
        lm.acquire_read("t", 1);
        lm.acquire_read("t", 2);
        lm.release_read("t");
        lm.release_read("t");
    }

    #[test]
    fn write_lock_is_reentrant_for_the_same_txn() {
        let lm = LockManager::new();
        lm.acquire_write("t", 1);
        lm.acquire_write("t", 1);
        lm.release_write("t");
    }
}
