//! Kernel utilities shared across slices.
//! Keep this crate lightweight: config loading, ids, and the capability
//! interfaces registered once at process start (analytics, item repository, orders).
//!
//! ## ID generation
//! Use `safe_nanoid!` for URL-safe, unambiguous IDs:
//! ```rust
//! # use wf_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```
//!
//! ## Config loading
//! ```rust,no_run
//! use wf_kernel::config::load_app_config;
//!
//! let cfg = load_app_config(Some("wayfinder.toml")).unwrap();
//! assert!(cfg.navigation.output_capacity > 0);
//! ```
pub mod analytics;
pub mod config;
pub mod repository;

pub use analytics::{AnalyticsDispatcher, AnalyticsEvent, MemoryAnalytics, TracingAnalytics};
pub use repository::{InMemoryItemRepository, InMemoryOrderBook, ItemRepository, OrderBook};

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use nanoid::nanoid;
pub use wf_domain as domain;

/// Generates an unambiguous `NanoID` (no visually confusing characters).
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
