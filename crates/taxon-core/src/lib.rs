//! # taxon-core
//!
//! Foundation crate for the taxon versioning core.
//! Defines identifiers, STAMP/path/coordinate/commit/chronicle models,
//! errors, config, collaborator traits, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod ids;
pub mod models;
pub mod traits;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::TaxonConfig;
pub use errors::{TaxonError, TaxonResult};
pub use ids::{Nid, StampSequence};
pub use models::{
    Chronicle, ChronologyKind, CommitRecord, PathOrigin, PathRecord, RelativePosition, Stamp,
    StampCoordinate, StampPosition, Status, Version, VersionPayload,
};
