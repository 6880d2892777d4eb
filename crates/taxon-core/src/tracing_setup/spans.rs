//! Span definitions for taxonomy collection, diffing, and commits.

/// Create a taxonomy collection span.
#[macro_export]
macro_rules! taxonomy_span {
    ($records:expr, $premise:expr) => {
        tracing::info_span!("taxon.taxonomy", records = $records, premise = ?$premise)
    };
}

/// Create a diff span.
#[macro_export]
macro_rules! diff_span {
    ($old:expr, $new:expr) => {
        tracing::info_span!("taxon.diff", old = %$old, new = %$new)
    };
}

/// Create a commit span.
#[macro_export]
macro_rules! commit_span {
    ($handle:expr) => {
        tracing::info_span!("taxon.commit", handle = $handle)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const TAXONOMY: &str = "taxon.taxonomy";
    pub const DIFF: &str = "taxon.diff";
    pub const COMMIT: &str = "taxon.commit";
}
