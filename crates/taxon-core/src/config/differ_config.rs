use serde::{Deserialize, Serialize};

use super::defaults;

/// Binary differ batch job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferConfig {
    /// Capacity of the bounded read → classify queue.
    pub queue_capacity: usize,
    /// Write batches allowed in flight at once.
    pub max_in_flight_writes: usize,
    /// Delta objects per write batch.
    pub write_batch_size: usize,
    /// Emit JSON analysis files next to the delta.
    pub write_analysis: bool,
}

impl Default for DifferConfig {
    fn default() -> Self {
        Self {
            queue_capacity: defaults::DEFAULT_DIFFER_QUEUE_CAPACITY,
            max_in_flight_writes: defaults::DEFAULT_DIFFER_MAX_IN_FLIGHT_WRITES,
            write_batch_size: defaults::DEFAULT_DIFFER_WRITE_BATCH_SIZE,
            write_analysis: defaults::DEFAULT_DIFFER_WRITE_ANALYSIS,
        }
    }
}
