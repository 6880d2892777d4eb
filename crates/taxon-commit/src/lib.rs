//! # taxon-commit
//!
//! Groups stamps, touched components and stamp aliases into immutable
//! [`CommitRecord`](taxon_core::CommitRecord)s. Finalizing a commit is
//! all-or-nothing: aliases are validated, the record is persisted with a
//! single `put`, and only then do the aliases and the record become visible.

mod external;
mod ledger;

pub use ledger::{record_key, CommitHandle, CommitLedger};
