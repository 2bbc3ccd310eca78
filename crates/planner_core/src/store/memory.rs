//! In-memory key-value store for tests and ephemeral sessions.

use super::{KeyValueStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared in-memory store. Clones observe the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    inner: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set`/`remove` fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of every stored entry.
    pub fn snapshot(&self) -> StoreResult<BTreeMap<String, String>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_writable()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_writable()?;
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvStore;
    use crate::store::{KeyValueStore, StoreError};

    #[test]
    fn clones_share_data_and_failure_switch() {
        let store = MemoryKvStore::new();
        let view = store.clone();

        store.set("k", "v").unwrap();
        assert_eq!(view.get("k").unwrap().as_deref(), Some("v"));

        view.set_fail_writes(true);
        assert!(matches!(store.set("k", "w"), Err(StoreError::Unavailable(_))));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
