//! Observability for taxon.
//! `tracing` with `EnvFilter`; span macros for the long-running operations.

pub mod setup;
pub mod spans;

pub use setup::{init_tracing, init_tracing_with_config};
