use serde_json::json;
use wf_domain::config::{AppConfig, LoggingConfig, NavigationConfig, RegistryConfig};
use wf_domain::features::FeatureSet;

#[test]
fn config_defaults_are_sane() {
    let navigation = NavigationConfig::default();
    assert_eq!(navigation.output_capacity, 64);
    assert!(navigation.animated);

    assert_eq!(RegistryConfig::default().max_resolution_depth, 32);

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(!logging.json);
    assert!(logging.directory.is_none());

    let cfg = AppConfig::default();
    assert_eq!(cfg.features, FeatureSet::ALL);
    assert!(cfg.validate().is_ok());
}

#[test]
fn app_config_deserializes_partial_json() {
    let raw = json!({
        "navigation": { "animated": false },
        "logging": { "level": "debug", "directory": "/tmp/wf" },
        "features": ["catalog", "detail"]
    });

    let cfg: AppConfig = serde_json::from_value(raw).expect("config deserialize");
    assert!(!cfg.navigation.animated);
    assert_eq!(cfg.navigation.output_capacity, 64);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.logging.directory, Some(std::path::PathBuf::from("/tmp/wf")));
    assert_eq!(cfg.features, FeatureSet::CATALOG | FeatureSet::DETAIL);
}

#[test]
fn app_config_deserializes_toml() {
    let raw = r#"
        features = "catalog,checkout"

        [registry]
        max_resolution_depth = 4
    "#;

    let cfg: AppConfig = toml::from_str(raw).expect("toml deserialize");
    assert_eq!(cfg.registry.max_resolution_depth, 4);
    assert_eq!(cfg.features, FeatureSet::CATALOG | FeatureSet::CHECKOUT);
}

#[test]
fn validate_rejects_zero_bounds() {
    let mut cfg = AppConfig::default();
    cfg.navigation.output_capacity = 0;
    let violation = cfg.validate().unwrap_err();
    assert_eq!(violation.field, "navigation.output_capacity");

    let mut cfg = AppConfig::default();
    cfg.registry.max_resolution_depth = 0;
    assert_eq!(cfg.validate().unwrap_err().to_string(), "registry.max_resolution_depth must be >= 1");

    let mut cfg = AppConfig::default();
    cfg.features = FeatureSet::empty();
    assert!(cfg.validate().is_err());
}

#[test]
fn clones_are_copy_on_write() {
    let original = AppConfig::default();
    let mut changed = original.clone();
    changed.navigation.animated = false;

    assert!(original.navigation.animated);
    assert!(!changed.navigation.animated);
}
