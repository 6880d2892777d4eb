//! # taxon-chronicle
//!
//! Stores every version of every component and answers "which version is
//! visible under this coordinate".

pub mod external;
pub mod filter;
pub mod store;

pub use filter::{LatestStamp, StampFilter};
pub use store::ChronicleStore;
