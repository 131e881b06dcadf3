use std::sync::Arc;
use tracing::{debug, info, warn};
use wf_detail::{DetailBuilderRef, DetailOutcome};
use wf_domain::catalog::ItemId;
use wf_kernel::{AnalyticsDispatcher, AnalyticsEvent};
use wf_navigation::{Coordinator, NavigationError, Navigator, Route};

/// Result of a catalog session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogOutcome {
    /// Number of completed purchases.
    pub purchases: usize,
    /// Items bought, in purchase order.
    pub bought: Vec<ItemId>,
}

/// Root coordinator: lists items and opens one detail at a time.
#[derive(Debug)]
pub struct CatalogCoordinator {
    route: Route,
    detail: Option<DetailBuilderRef>,
    analytics: Arc<dyn AnalyticsDispatcher>,
    bought: Vec<ItemId>,
}

impl CatalogCoordinator {
    pub fn new(route: Route, detail: Option<DetailBuilderRef>, analytics: Arc<dyn AnalyticsDispatcher>) -> Self {
        Self { route, detail, analytics, bought: Vec::new() }
    }

    pub(crate) fn on_item_selected(&mut self, item: Arc<ItemId>, nav: &mut Navigator<Self>) {
        if let Some(open) = nav.children().into_iter().find(|c| c.state.is_live()) {
            debug!(item = %item, open = %open.name, "Detail already open");
            return;
        }
        let Some(detail) = &self.detail else {
            warn!(item = %item, "Item detail is not available");
            return;
        };
        let Some(router) = self.route.surface() else {
            return;
        };

        // Unknown items build nothing and leave the catalog as it is.
        let Some(module) = detail.build_module(router, *item) else {
            return;
        };
        nav.start_child(&module, Self::on_detail);
    }

    pub(crate) fn on_closed(&mut self, _: Arc<()>, nav: &mut Navigator<Self>) {
        if let Err(err) = self.route.dismiss(nav.animated()) {
            debug!(error = %err, "Catalog surface already gone");
        }
        let bought = std::mem::take(&mut self.bought);
        self.analytics.track(AnalyticsEvent::new("catalog_closed").with("purchases", bought.len()));
        nav.complete(CatalogOutcome { purchases: bought.len(), bought });
    }

    fn on_detail(&mut self, outcome: DetailOutcome, _: &mut Navigator<Self>) {
        if outcome.purchased {
            info!(item = %outcome.item, "Item purchased");
            self.bought.push(outcome.item);
        }
    }
}

impl Coordinator for CatalogCoordinator {
    type Output = CatalogOutcome;

    fn start(&mut self, nav: &mut Navigator<Self>) -> Result<(), NavigationError> {
        self.route.present(nav.animated())?;
        self.analytics.track(AnalyticsEvent::new("catalog_opened"));
        Ok(())
    }

    fn on_cancel(&mut self) {
        debug!(purchases = self.bought.len(), "Catalog torn down");
    }
}
