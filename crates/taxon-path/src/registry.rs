//! PathRegistry: lazily built, atomically swapped path snapshot.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

use taxon_core::errors::TaxonResult;
use taxon_core::models::{PathOrigin, RelativePosition, StampPosition};
use taxon_core::traits::PathSource;
use taxon_core::Nid;

use crate::snapshot::PathSnapshot;

/// Serves path queries from an immutable snapshot.
///
/// The first read builds the snapshot under `build_lock`; every later read
/// loads it without locking. [`invalidate`](Self::invalidate) drops the
/// snapshot and the next read rebuilds it from the source.
pub struct PathRegistry {
    source: Arc<dyn PathSource>,
    snapshot: ArcSwapOption<PathSnapshot>,
    build_lock: Mutex<()>,
}

impl PathRegistry {
    pub fn new(source: Arc<dyn PathSource>) -> Self {
        Self {
            source,
            snapshot: ArcSwapOption::empty(),
            build_lock: Mutex::new(()),
        }
    }

    /// The current snapshot, building it on first use.
    pub fn snapshot(&self) -> TaxonResult<Arc<PathSnapshot>> {
        if let Some(snapshot) = self.snapshot.load_full() {
            return Ok(snapshot);
        }
        let _guard = self.build_lock.lock();
        if let Some(snapshot) = self.snapshot.load_full() {
            return Ok(snapshot);
        }
        let records = self.source.load_paths()?;
        let snapshot = Arc::new(PathSnapshot::from_records(records));
        tracing::info!(paths = snapshot.len(), "path snapshot rebuilt");
        self.snapshot.store(Some(Arc::clone(&snapshot)));
        Ok(snapshot)
    }

    /// Drop the snapshot after a structural change to the path set.
    pub fn invalidate(&self) {
        let _guard = self.build_lock.lock();
        self.snapshot.store(None);
        tracing::debug!("path snapshot invalidated");
    }

    pub fn exists(&self, path: Nid) -> TaxonResult<bool> {
        Ok(self.snapshot()?.exists(path))
    }

    pub fn origins(&self, path: Nid) -> TaxonResult<Vec<PathOrigin>> {
        Ok(self.snapshot()?.origins(path).to_vec())
    }

    pub fn relative_position(
        &self,
        a: StampPosition,
        b: StampPosition,
    ) -> TaxonResult<RelativePosition> {
        self.snapshot()?.relative_position(a, b)
    }
}
