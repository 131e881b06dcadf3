use std::sync::Arc;
use tracing::{debug, warn};
use wf_checkout::{CheckoutBuilderRef, PurchaseFlow};
use wf_domain::catalog::ItemId;
use wf_domain::constants::DETAIL;
use wf_kernel::{AnalyticsDispatcher, AnalyticsEvent};
use wf_navigation::{Coordinator, NavigationError, Navigator, Route};

/// Result of the detail feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailOutcome {
    pub item: ItemId,
    pub purchased: bool,
}

/// Shows an item; leaves after a completed purchase or when closed.
///
/// `checkout` is `None` when the checkout feature is disabled, in which
/// case buying does nothing.
#[derive(Debug)]
pub struct DetailCoordinator {
    route: Route,
    item: ItemId,
    checkout: Option<CheckoutBuilderRef>,
    analytics: Arc<dyn AnalyticsDispatcher>,
}

impl DetailCoordinator {
    pub fn new(
        route: Route,
        item: ItemId,
        checkout: Option<CheckoutBuilderRef>,
        analytics: Arc<dyn AnalyticsDispatcher>,
    ) -> Self {
        Self { route, item, checkout, analytics }
    }

    pub(crate) fn on_buy_requested(&mut self, item: Arc<ItemId>, nav: &mut Navigator<Self>) {
        if nav.children().iter().any(|c| c.state.is_live()) {
            debug!(item = %item, "Checkout already in progress");
            return;
        }
        let Some(checkout) = &self.checkout else {
            warn!(item = %item, "Checkout is not available");
            return;
        };
        let Some(router) = self.route.surface() else {
            return;
        };

        let Some(module) = checkout.build_module(router, PurchaseFlow::new(*item, DETAIL).into_token()) else {
            return;
        };
        if nav.start_child(&module, Self::on_checkout) {
            self.analytics.track(AnalyticsEvent::new("checkout_started").with("item", *item));
        }
    }

    pub(crate) fn on_closed(&mut self, _: Arc<()>, nav: &mut Navigator<Self>) {
        self.leave(nav, false);
    }

    fn on_checkout(&mut self, purchased: bool, nav: &mut Navigator<Self>) {
        if purchased {
            self.leave(nav, true);
        } else {
            debug!(item = %self.item, "Checkout abandoned; staying on the item");
        }
    }

    fn leave(&self, nav: &mut Navigator<Self>, purchased: bool) {
        if let Err(err) = self.route.dismiss(nav.animated()) {
            debug!(error = %err, "Detail surface already gone");
        }
        nav.complete(DetailOutcome { item: self.item, purchased });
    }
}

impl Coordinator for DetailCoordinator {
    type Output = DetailOutcome;

    fn start(&mut self, nav: &mut Navigator<Self>) -> Result<(), NavigationError> {
        self.route.present(nav.animated())?;
        Ok(())
    }
}
