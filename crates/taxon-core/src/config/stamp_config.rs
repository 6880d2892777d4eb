use serde::{Deserialize, Serialize};

use super::defaults;

/// Stamp registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    /// Pre-sized capacity of the tuple ↔ sequence tables.
    pub initial_capacity: usize,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            initial_capacity: defaults::DEFAULT_STAMP_INITIAL_CAPACITY,
        }
    }
}
