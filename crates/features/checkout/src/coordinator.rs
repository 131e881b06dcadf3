use std::sync::Arc;
use tracing::debug;
use wf_domain::catalog::Order;
use wf_kernel::{AnalyticsDispatcher, AnalyticsEvent};
use wf_navigation::{Coordinator, NavigationError, Navigator, Route};

/// Completes with `true` once the order is placed, `false` when abandoned.
#[derive(Debug)]
pub struct CheckoutCoordinator {
    route: Route,
    analytics: Arc<dyn AnalyticsDispatcher>,
    flow: String,
}

impl CheckoutCoordinator {
    pub fn new(route: Route, analytics: Arc<dyn AnalyticsDispatcher>, flow: impl Into<String>) -> Self {
        Self { route, analytics, flow: flow.into() }
    }

    pub(crate) fn on_confirmed(&mut self, order: Arc<Order>, nav: &mut Navigator<Self>) {
        debug!(order = %order.id, flow = %self.flow, "Checkout confirmed");
        self.dismiss(nav);
        nav.complete(true);
    }

    pub(crate) fn on_cancelled(&mut self, _: Arc<()>, nav: &mut Navigator<Self>) {
        self.analytics.track(AnalyticsEvent::new("checkout_cancelled").with("flow", &self.flow));
        self.dismiss(nav);
        nav.complete(false);
    }

    fn dismiss(&self, nav: &Navigator<Self>) {
        if let Err(err) = self.route.dismiss(nav.animated()) {
            debug!(error = %err, "Checkout surface already gone");
        }
    }
}

impl Coordinator for CheckoutCoordinator {
    type Output = bool;

    fn start(&mut self, nav: &mut Navigator<Self>) -> Result<(), NavigationError> {
        self.route.present(nav.animated())?;
        self.analytics.track(AnalyticsEvent::new("checkout_presented").with("flow", &self.flow));
        Ok(())
    }

    fn on_cancel(&mut self) {
        debug!(flow = %self.flow, "Checkout abandoned");
    }
}
