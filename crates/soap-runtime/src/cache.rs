//! Instance-local cache slot storage.
//!
//! Slots are single-writer-in-practice: nothing enforces mutual exclusion
//! across concurrent invocations of the same cache-populating method, so two
//! racing calls resolve last-writer-wins. This is accepted weak consistency,
//! not a correctness bug.

use std::collections::HashMap;

use parking_lot::Mutex;
use soap_model::Value;

#[derive(Debug, Default)]
pub struct CacheStore {
    slots: Mutex<HashMap<String, Value>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current slot value, if the slot has been populated.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.slots.lock().get(name).cloned()
    }

    pub fn put(&self, name: &str, value: Value) {
        self.slots.lock().insert(name.to_string(), value);
    }

    /// Reset every slot to absent.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}
