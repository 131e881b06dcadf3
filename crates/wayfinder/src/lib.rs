//! Facade crate for Wayfinder.
//! Re-exports the shared crates and composes the feature slices into a
//! bootstrapped process. Keep this crate thin: it wires crates together and
//! owns no navigation or business logic.
//!
//! ## Usage
//! ```rust,no_run
//! use wayfinder::domain::config::AppConfig;
//! use wayfinder::navigation::Stage;
//!
//! # async fn run() -> Result<(), wayfinder::BootstrapError> {
//! let app = wayfinder::bootstrap(&AppConfig::default())?;
//! let stage = Stage::new("main");
//! if let Some(running) = app.launch(&stage) {
//!     let outcome = running.outcome().await;
//! }
//! # Ok(())
//! # }
//! ```

mod app;
mod error;

pub use app::{App, Capabilities, bootstrap, bootstrap_with};
pub use error::{BootstrapError, BootstrapErrorExt};

pub use wf_domain as domain;
pub use wf_kernel as kernel;
pub use wf_navigation as navigation;
pub use wf_registry as registry;
pub use wf_signals as signals;

/// Feature slices, in dependency order.
pub mod features {
    pub use wf_catalog as catalog;
    pub use wf_checkout as checkout;
    pub use wf_detail as detail;
}
