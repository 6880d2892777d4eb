//! # taxon-engine
//!
//! [`VersioningEngine`] is the explicit context object holding every
//! component of one store. Writes go through a [`Transaction`]: versions are
//! stamped with uncommitted stamps, and commit replaces those with
//! committed ones and finalizes a commit record.

pub mod engine;
pub mod exchange;
pub mod transaction;

pub use engine::VersioningEngine;
pub use exchange::{ExportCounts, ImportReport};
pub use transaction::Transaction;
