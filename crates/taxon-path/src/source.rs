use parking_lot::RwLock;

use taxon_core::errors::TaxonResult;
use taxon_core::models::PathRecord;
use taxon_core::traits::PathSource;

/// In-memory path source. Edits are picked up after the owning registry
/// is invalidated.
#[derive(Debug, Default)]
pub struct StaticPathSource {
    records: RwLock<Vec<PathRecord>>,
}

impl StaticPathSource {
    pub fn new(records: Vec<PathRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn add_path(&self, record: PathRecord) {
        self.records.write().push(record);
    }
}

impl PathSource for StaticPathSource {
    fn load_paths(&self) -> TaxonResult<Vec<PathRecord>> {
        Ok(self.records.read().clone())
    }
}
