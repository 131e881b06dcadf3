//! # Registry
//!
//! A type-keyed factory store that resolves a capability to a value on demand.
//!
//! A capability is identified by the Rust type a factory produces, usually a
//! shared trait object such as `Arc<dyn AnalyticsDispatcher>`. Resolution is
//! synchronous and lazy: factories run when a value is requested, and may in
//! turn resolve their own dependencies from the registry they are given.
//!
//! Absence is not an error. [`Registry::resolve`] returns `None` when nothing is
//! registered or when a factory declines to produce a value; builders that need
//! a typed failure use [`Registry::require`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wf_registry::Registry;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_owned()
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register::<Arc<dyn Greeter>, _>(|_| Some(Arc::new(English)));
//!
//! let greeter = registry.resolve::<Arc<dyn Greeter>>().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

mod error;
mod registry;

pub use error::{RegistryError, RegistryErrorExt};
pub use registry::{Discipline, Registry};

/// The name the rest of the workspace documents this store under.
pub type DependencyRegistry = Registry;

/// Default limit for nested resolution.
pub const DEFAULT_MAX_DEPTH: usize = 32;
