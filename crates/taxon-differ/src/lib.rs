//! # taxon-differ
//!
//! Offline comparison of two full IBDF exports. Every component UUID seen
//! on either side is classified as added, retired, modified or unchanged,
//! and the changes are re-encoded as an IBDF delta that a store can import
//! as an incremental update.

pub mod analysis;
pub mod budget;
pub mod delta;
pub mod diff;
pub mod export;
pub mod job;
pub mod options;

pub use analysis::DiffAnalysis;
pub use budget::{WriteBudget, WritePermit};
pub use delta::{ChangeKind, DeltaSet, DeltaSummary};
pub use diff::diff;
pub use export::Export;
pub use job::{DiffJob, DiffReport};
pub use options::{DiffOptions, StampKey, VersionKey};
