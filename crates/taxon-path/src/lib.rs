//! # taxon-path
//!
//! Paths are named branches of development. A path may originate on
//! another path at a point in time; that origin is what orders versions
//! living on different paths.
//!
//! Ancestry is resolved one hop at a time: a version on `P1` is before a
//! version on `P3` only when `P3` has an origin directly on `P1`, even if
//! `P3` branches from `P2` which in turn branches from `P1`.

mod registry;
mod snapshot;
mod source;

pub use registry::PathRegistry;
pub use snapshot::PathSnapshot;
pub use source::StaticPathSource;
