use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::KVError;
use crate::traits::KVStore;

/// MemoryStore keeps values in a process-local map.
///
/// Used by tests and ephemeral deployments. Writes can be made to fail on
/// demand to exercise storage error paths.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `set` calls fail with `KVError::Storage`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self, key: &str) -> Result<(), KVError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KVError::Storage(format!("write rejected for {}", key)));
        }
        Ok(())
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.check_writable(key)?;
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("memory:{}", key)
    }
}
