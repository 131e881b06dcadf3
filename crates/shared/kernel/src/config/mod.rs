use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wf_domain::config::{AppConfig, ConfigViolation};
use wf_domain::constants::{APP_NAME, ENV_PREFIX, ENV_SEPARATOR};

#[wf_derive::wf_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Invalid config{}: {source}", format_context(.context))]
    Invalid { source: ConfigViolation, context: Option<Cow<'static, str>> },
}

/// Loads a configuration by layering a file with environment overrides.
///
/// 1. **Base file**: `path` when given (must exist), otherwise an optional
///    `wayfinder.{toml,json,...}` in the working directory.
/// 2. **Environment**: variables prefixed with `WAYFINDER__`; nested keys use
///    double underscores (`WAYFINDER__NAVIGATION__ANIMATED=false` maps to
///    `navigation.animated`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source is
/// malformed, or the merged values do not match `T`.
///
/// # Example
/// ```rust
/// use wf_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     animated: bool,
/// }
///
/// let cfg: Settings = load_config(Some("config/missing")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let effective_path = path.map_or_else(|| PathBuf::from(APP_NAME), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads and validates the [`AppConfig`].
///
/// # Errors
/// Returns [`ConfigError::Config`] for loading failures and
/// [`ConfigError::Invalid`] when a value is out of range.
pub fn load_app_config(path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    let config = load_config::<AppConfig>(path)?;
    config.validate().context("Rejected app config")?;
    debug!(
        output_capacity = config.navigation.output_capacity,
        animated = config.navigation.animated,
        max_resolution_depth = config.registry.max_resolution_depth,
        features = ?config.features,
        "App config loaded"
    );
    Ok(config)
}
