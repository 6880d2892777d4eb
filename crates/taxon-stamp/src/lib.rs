//! # taxon-stamp
//!
//! Owns the bijection between STAMP tuples and their integer sequences,
//! stamp aliases, stamp comments, and the uncommitted → committed/canceled
//! lifecycle.

mod aliases;
pub mod externalize;
mod registry;

pub use registry::StampRegistry;
