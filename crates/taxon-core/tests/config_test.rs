use taxon_core::config::*;
use taxon_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = TaxonConfig::from_toml("").unwrap();

    assert_eq!(config.stamp.initial_capacity, 1_024);
    assert_eq!(config.taxonomy.batch_size, 4_096);
    assert!(config.taxonomy.parallel);
    assert_eq!(config.differ.queue_capacity, 1_024);
    assert_eq!(config.differ.max_in_flight_writes, 4);
    assert_eq!(config.differ.write_batch_size, 512);
    assert!(config.differ.write_analysis);
    assert_eq!(config.storage.db_path, "taxon.db");
    assert_eq!(config.storage.busy_timeout_ms, 5_000);
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[taxonomy]
batch_size = 64
parallel = false

[differ]
max_in_flight_writes = 2
"#;
    let config = TaxonConfig::from_toml(toml).unwrap();
    assert_eq!(config.taxonomy.batch_size, 64);
    assert!(!config.taxonomy.parallel);
    assert_eq!(config.differ.max_in_flight_writes, 2);
    // Untouched keys keep their defaults.
    assert_eq!(config.differ.queue_capacity, 1_024);
    assert_eq!(config.storage.db_path, "taxon.db");
}

#[test]
fn config_rejects_zero_batch_size() {
    let err = TaxonConfig::from_toml("[taxonomy]\nbatch_size = 0\n").unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "taxonomy.batch_size"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn config_rejects_malformed_toml() {
    let err = TaxonConfig::from_toml("[differ\nqueue_capacity = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn config_round_trips_through_toml() {
    let mut config = TaxonConfig::default();
    config.storage.db_path = "/var/lib/taxon/store.db".to_string();
    config.observability.json = true;

    let toml_str = config.to_toml().unwrap();
    let back = TaxonConfig::from_toml(&toml_str).unwrap();
    assert_eq!(back.storage.db_path, "/var/lib/taxon/store.db");
    assert!(back.observability.json);
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taxon.toml");
    std::fs::write(&path, "[stamp]\ninitial_capacity = 8\n").unwrap();

    let config = TaxonConfig::load(&path).unwrap();
    assert_eq!(config.stamp.initial_capacity, 8);

    let missing = TaxonConfig::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::FileNotFound { .. }));
}
