use crate::error::{BootstrapError, BootstrapErrorExt};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wf_catalog::{CatalogBuilderRef, CatalogOutcome};
use wf_domain::config::AppConfig;
use wf_domain::features::FeatureSet;
use wf_kernel::{AnalyticsDispatcher, InMemoryItemRepository, InMemoryOrderBook, ItemRepository, OrderBook, TracingAnalytics};
use wf_navigation::{Running, Stage, resolve_builder};
use wf_registry::Registry;
use wf_signals::NotificationCenter;

/// Process-wide capabilities handed to [`bootstrap_with`].
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub analytics: Arc<dyn AnalyticsDispatcher>,
    pub items: Arc<dyn ItemRepository>,
    pub orders: Arc<dyn OrderBook>,
}

impl Default for Capabilities {
    /// Tracing analytics over the sample catalog and an in-memory order book.
    fn default() -> Self {
        Self {
            analytics: Arc::new(TracingAnalytics),
            items: Arc::new(InMemoryItemRepository::sample()),
            orders: Arc::new(InMemoryOrderBook::new()),
        }
    }
}

/// A bootstrapped process: the registry with every enabled feature in it.
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    registry: Registry,
    notifications: NotificationCenter,
    orders: Arc<dyn OrderBook>,
}

/// Bootstraps the process with the default [`Capabilities`].
///
/// # Errors
/// See [`bootstrap_with`].
pub fn bootstrap(config: &AppConfig) -> Result<App, BootstrapError> {
    bootstrap_with(config, Capabilities::default())
}

/// Builds the process registry in dependency order.
///
/// 1. the registry itself, bounded by `registry.max_resolution_depth`
/// 2. analytics
/// 3. the notification center
/// 4. the item repository and the order book
/// 5. the builders of the enabled features
///
/// # Errors
/// Returns [`BootstrapError::Config`] when `config` fails validation.
pub fn bootstrap_with(config: &AppConfig, capabilities: Capabilities) -> Result<App, BootstrapError> {
    config.validate().context("Refusing to bootstrap")?;

    let registry = Registry::with_max_depth(config.registry.max_resolution_depth);
    registry.register_instance(config.clone());

    registry.register_instance(capabilities.analytics);

    let notifications = NotificationCenter::new();
    registry.register_instance(notifications.clone());

    registry.register_instance(capabilities.items);
    registry.register_instance(Arc::clone(&capabilities.orders));

    let features = config.features;
    if features.contains(FeatureSet::CHECKOUT) {
        wf_checkout::register(&registry);
    }
    if features.contains(FeatureSet::DETAIL) {
        wf_detail::register(&registry);
    }
    if features.contains(FeatureSet::CATALOG) {
        wf_catalog::register(&registry);
    }

    info!(features = ?features, capabilities = registry.len(), "Wayfinder bootstrapped");
    debug!(capabilities = ?registry.capabilities(), "Process registry");

    Ok(App { config: config.clone(), registry, notifications, orders: capabilities.orders })
}

impl App {
    /// Presents the catalog on `stage` and starts it as the root coordinator.
    ///
    /// Returns `None` (logged) when the catalog is disabled or cannot be built.
    #[must_use = "dropping the running handle cancels the catalog"]
    pub fn launch(&self, stage: &Stage) -> Option<Running<CatalogOutcome>> {
        let catalog: Option<CatalogBuilderRef> = resolve_builder(&self.registry);
        let Some(catalog) = catalog else {
            warn!(features = ?self.config.features, "Catalog feature is not enabled");
            return None;
        };

        let running = catalog.build_module(&stage.root(), ())?.start()?;
        info!(module = %running.id(), "Catalog launched");
        Some(running)
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub const fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderBook {
        self.orders.as_ref()
    }
}
