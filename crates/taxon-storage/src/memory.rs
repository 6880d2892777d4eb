//! In-memory key → bytes store.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;

use taxon_core::errors::{StorageError, TaxonResult};
use taxon_core::traits::PersistenceProvider;

/// Process-local store. `fail_writes` makes every later `put` fail, which is
/// how commit failure paths are exercised.
#[derive(Default)]
pub struct MemoryPersistence {
    objects: DashMap<i32, Vec<u8>>,
    fail_writes: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn keys(&self) -> Vec<i32> {
        let mut keys: Vec<i32> = self.objects.iter().map(|e| *e.key()).collect();
        keys.sort_unstable();
        keys
    }
}

impl PersistenceProvider for MemoryPersistence {
    fn get(&self, key: i32) -> TaxonResult<Option<Vec<u8>>> {
        Ok(self.objects.get(&key).map(|b| b.clone()))
    }

    fn put(&self, key: i32, bytes: &[u8]) -> TaxonResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed {
                key,
                reason: "writes disabled".to_string(),
            }
            .into());
        }
        self.objects.insert(key, bytes.to_vec());
        Ok(())
    }
}
