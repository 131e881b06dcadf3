use crate::constants::{DEFAULT_MAX_RESOLUTION_DEPTH, DEFAULT_OUTPUT_CAPACITY};
use crate::features::FeatureSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub navigation: NavigationConfig,
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
    pub features: FeatureSet,
}

/// Thin Arc-wrapped config for inexpensive cloning into builders and coordinators.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

impl AppConfig {
    /// Checks the bounds serde cannot express.
    ///
    /// # Errors
    /// Returns the first [`ConfigViolation`] found.
    pub fn validate(&self) -> Result<(), ConfigViolation> {
        if self.inner.navigation.output_capacity == 0 {
            return Err(ConfigViolation { field: "navigation.output_capacity", rule: "must be >= 1" });
        }
        if self.inner.registry.max_resolution_depth == 0 {
            return Err(ConfigViolation {
                field: "registry.max_resolution_depth",
                rule: "must be >= 1",
            });
        }
        if self.inner.features.is_empty() {
            return Err(ConfigViolation { field: "features", rule: "at least one feature must be enabled" });
        }
        Ok(())
    }
}

/// Coordinator and view-model channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Backlog at which a view-model outlet observer is reported as falling behind.
    pub output_capacity: usize,
    /// Default animation flag handed to presentation surfaces.
    pub animated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Deepest nested resolution before a capability is treated as unresolved.
    pub max_resolution_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub directory: Option<PathBuf>,
}

/// A configuration value outside its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigViolation {
    pub field: &'static str,
    pub rule: &'static str,
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.rule)
    }
}

impl std::error::Error for ConfigViolation {}

// --- Default ---

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { output_capacity: DEFAULT_OUTPUT_CAPACITY, animated: true }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), json: false, directory: None }
    }
}
