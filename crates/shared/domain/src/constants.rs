pub const APP_NAME: &str = "wayfinder";

/// Prefix of environment overrides, e.g. `WAYFINDER__NAVIGATION__ANIMATED=false`.
pub const ENV_PREFIX: &str = "WAYFINDER";
pub const ENV_SEPARATOR: &str = "__";

pub const CATALOG: &str = "catalog";
pub const DETAIL: &str = "detail";
pub const CHECKOUT: &str = "checkout";

/// `tracing` target of analytics events.
pub const ANALYTICS_TARGET: &str = "analytics";

pub const DEFAULT_OUTPUT_CAPACITY: usize = 64;
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 32;
