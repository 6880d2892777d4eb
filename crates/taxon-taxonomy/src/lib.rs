//! # taxon-taxonomy
//!
//! Per-concept taxonomy records (every is-a edge ever asserted, with the
//! stamps that asserted it), the coordinate-driven reduction of those
//! records into a [`Tree`], and traversal and analytics over the result.

pub mod analytics;
pub mod collector;
pub mod flags;
pub mod indexer;
pub mod packed;
pub mod traversal;
pub mod tree;
pub mod unpacked;
pub mod visit_data;

pub use analytics::TreeStats;
pub use collector::{EdgeSelector, TaxonomyCollector, TreeBuilder};
pub use flags::TaxonomyFlags;
pub use indexer::TaxonomyIndexer;
pub use packed::TaxonomyRecordPacked;
pub use tree::Tree;
pub use unpacked::TaxonomyRecordUnpacked;
pub use visit_data::{NodeStatus, TreeNodeVisitData};
