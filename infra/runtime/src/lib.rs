//! # Runtime
//!
//! Standardized [Tokio](https://tokio.rs) runtime profiles for Wayfinder hosts.
//!
//! ## Profiles
//! * **Interactive**: a current-thread scheduler. A coordinator tree and its
//!   presentation layer share this single logical execution context, so output
//!   events and navigation reactions are serialized.
//! * **Background**: a multi-threaded scheduler for hosts doing heavy work
//!   (data loading, indexing) next to navigation.
//!
//! ## Example
//!
//! ```rust,ignore
//! #[wf_runtime::main(interactive)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use wf_derive::main;

use anyhow::anyhow;
use std::{sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

/// The default number of worker threads if detection fails.
const DEFAULT_WORKER_THREADS: usize = 4;
/// The default stack size for threads (2 `MiB`).
const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;
/// Minimum allowed stack size (1 `MiB`).
const MIN_STACK_SIZE: usize = 1024 * 1024;
/// Maximum allowed stack size (16 `MiB`).
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const MAX_WORKER_THREADS: usize = 1024;
const THREAD_KEEP_ALIVE: Duration = Duration::from_secs(60);

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

/// Scheduler flavor of a runtime profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduler {
    /// Everything runs on the thread that calls `block_on`.
    CurrentThread,
    /// Work-stealing pool of worker threads.
    MultiThread,
}

fn detect_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0 && n <= MAX_WORKER_THREADS)
            .unwrap_or_else(|| {
                available_parallelism()
                    .map(std::num::NonZero::get)
                    .unwrap_or(DEFAULT_WORKER_THREADS)
            })
    })
}

fn normalize_thread_name(name: &str) -> String {
    if name.trim().is_empty() { "wf-worker".to_owned() } else { name.to_owned() }
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub scheduler: Scheduler,
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            scheduler: Scheduler::MultiThread,
            worker_threads: detect_worker_threads(),
            stack_size: DEFAULT_STACK_SIZE,
            thread_name: "wf-worker".to_owned(),
            thread_keep_alive: THREAD_KEEP_ALIVE,
        }
    }
}

impl RuntimeConfig {
    /// Single logical execution context for a coordinator tree.
    #[must_use = "Use this configuration for interactive navigation hosts"]
    pub fn interactive() -> Self {
        Self {
            scheduler: Scheduler::CurrentThread,
            worker_threads: 1,
            thread_name: "wf-main".to_owned(),
            ..Self::default()
        }
    }

    /// Preset for hosts that run heavy work next to navigation.
    #[must_use = "Use this configuration for background-heavy hosts"]
    pub fn background() -> Self {
        Self {
            scheduler: Scheduler::MultiThread,
            worker_threads: detect_worker_threads(),
            stack_size: 4 * 1024 * 1024,
            thread_name: "wf-background".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
        }
    }

    #[must_use = "Customize the number of worker threads for the runtime"]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use = "Customize the stack size for worker threads"]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use = "Customize the thread name"]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = normalize_thread_name(&name.into());
        self
    }

    fn normalized(&self) -> Self {
        Self {
            scheduler: self.scheduler,
            worker_threads: self.worker_threads.clamp(1, MAX_WORKER_THREADS),
            stack_size: self.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE),
            thread_name: normalize_thread_name(&self.thread_name),
            thread_keep_alive: self.thread_keep_alive,
        }
    }
}

/// Creates a new Tokio runtime from a [`RuntimeConfig`].
///
/// The current-thread scheduler ignores `worker_threads`; blocking-pool
/// threads still use the configured name and stack size.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the runtime cannot be created, typically due to
/// OS-level limits on thread creation.
///
/// # Examples
///
/// ```rust
/// use wf_runtime::{RuntimeConfig, build_runtime_with_config};
///
/// let runtime = build_runtime_with_config(&RuntimeConfig::interactive())?;
/// let answer = runtime.block_on(async { 42 });
/// assert_eq!(answer, 42);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(config = ?config, "Building tokio runtime");

    let mut builder = match config.scheduler {
        Scheduler::CurrentThread => Builder::new_current_thread(),
        Scheduler::MultiThread => {
            let mut builder = Builder::new_multi_thread();
            builder.worker_threads(config.worker_threads);
            builder
        },
    };

    builder
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all();

    builder.build().map_err(|e| anyhow!("Failed to initialize runtime: {e}"))
}

/// Builds the interactive (current-thread) runtime used by navigation hosts.
///
/// # Errors
///
/// Returns an [`anyhow::Error`] if the runtime cannot be created.
pub fn build_interactive_runtime() -> Result<Runtime> {
    info!("Initializing interactive runtime");
    build_runtime_with_config(&RuntimeConfig::interactive())
}
