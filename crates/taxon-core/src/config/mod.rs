//! Configuration system for taxon.
//! TOML-based; every section defaults independently.

pub mod defaults;
pub mod differ_config;
pub mod observability_config;
pub mod stamp_config;
pub mod storage_config;
pub mod taxon_config;
pub mod taxonomy_config;

pub use differ_config::DifferConfig;
pub use observability_config::ObservabilityConfig;
pub use stamp_config::StampConfig;
pub use storage_config::StorageConfig;
pub use taxon_config::TaxonConfig;
pub use taxonomy_config::TaxonomyConfig;
