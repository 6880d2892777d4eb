use serde::{Deserialize, Serialize};

use super::defaults;

/// Taxonomy collector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Records folded between two cancellation checks.
    pub batch_size: usize,
    /// Reduce on the rayon pool instead of the calling thread.
    pub parallel: bool,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            batch_size: defaults::DEFAULT_TAXONOMY_BATCH_SIZE,
            parallel: defaults::DEFAULT_TAXONOMY_PARALLEL,
        }
    }
}
