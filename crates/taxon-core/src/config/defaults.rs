// Single source of truth for all default values.

// --- Stamps ---
pub const DEFAULT_STAMP_INITIAL_CAPACITY: usize = 1_024;

// --- Taxonomy ---
pub const DEFAULT_TAXONOMY_BATCH_SIZE: usize = crate::constants::DEFAULT_TAXONOMY_BATCH_SIZE;
pub const DEFAULT_TAXONOMY_PARALLEL: bool = true;

// --- Differ ---
pub const DEFAULT_DIFFER_QUEUE_CAPACITY: usize = 1_024;
pub const DEFAULT_DIFFER_MAX_IN_FLIGHT_WRITES: usize = 4;
pub const DEFAULT_DIFFER_WRITE_BATCH_SIZE: usize = 512;
pub const DEFAULT_DIFFER_WRITE_ANALYSIS: bool = true;

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "taxon.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = false;
