use crate::errors::TaxonResult;
use crate::models::PathRecord;

/// Supplies the full set of paths and their origins. Read once per path
/// registry snapshot.
pub trait PathSource: Send + Sync {
    fn load_paths(&self) -> TaxonResult<Vec<PathRecord>>;
}
