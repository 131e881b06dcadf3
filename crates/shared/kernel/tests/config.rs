use std::fs;
use tempfile::tempdir;
use wf_domain::features::FeatureSet;
use wf_kernel::config::{ConfigError, load_app_config, load_config};

#[test]
fn file_values_are_loaded_and_validated() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("wayfinder.toml");
    fs::write(
        &path,
        r#"
            features = ["catalog", "detail"]

            [navigation]
            output_capacity = 8
            animated = false
        "#,
    )?;

    let cfg = load_app_config(Some(&path))?;
    assert_eq!(cfg.navigation.output_capacity, 8);
    assert!(!cfg.navigation.animated);
    assert_eq!(cfg.registry.max_resolution_depth, 32);
    assert_eq!(cfg.features, FeatureSet::CATALOG | FeatureSet::DETAIL);
    Ok(())
}

#[test]
fn json_sources_are_accepted() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("wayfinder.json");
    fs::write(&path, r#"{ "logging": { "level": "debug", "json": true } }"#)?;

    let cfg = load_app_config(Some(&path))?;
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert_eq!(cfg.features, FeatureSet::ALL);
    Ok(())
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = load_config::<serde_json::Value>(Some("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Config { .. }));
}

#[test]
fn out_of_range_values_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("wayfinder.toml");
    fs::write(&path, "[navigation]\noutput_capacity = 0\n")?;

    let err = load_app_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
    assert!(err.to_string().contains("navigation.output_capacity"), "{err}");
    Ok(())
}
