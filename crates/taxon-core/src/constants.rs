/// Taxon system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// First stamp sequence handed out by a fresh registry. Zero is never a valid sequence.
pub const FIRST_STAMP_SEQUENCE: i32 = 1;

/// Largest stamp sequence representable in a packed taxonomy word (28 bits).
pub const MAX_PACKED_STAMP_SEQUENCE: i32 = (1 << 28) - 1;

/// Current data format version written into every IBDF frame header.
pub const IBDF_DATA_FORMAT_VERSION: u8 = 1;

/// Upper bound on a single IBDF payload, guarding against corrupt length words.
pub const MAX_IBDF_PAYLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Maximum number of records folded between two cancellation checks.
pub const DEFAULT_TAXONOMY_BATCH_SIZE: usize = 4_096;
