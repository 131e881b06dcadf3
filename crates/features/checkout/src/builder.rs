use crate::coordinator::CheckoutCoordinator;
use crate::flow::PurchaseFlow;
use crate::interactor::{CheckoutInteractor, CheckoutService};
use crate::view_model::CheckoutViewModel;
use std::sync::Arc;
use tracing::warn;
use wf_domain::config::AppConfig;
use wf_domain::constants::CHECKOUT;
use wf_kernel::AnalyticsDispatcher;
use wf_navigation::{
    Bindings, BuilderRef, FlowManager, Module, ModuleBuilder, Route, Screen, SurfaceRef, ViewModel,
    downcast_flow, resolve_module,
};
use wf_registry::Registry;
use wf_signals::Outlet;

/// What other features resolve to start a checkout.
pub type CheckoutBuilderRef = BuilderRef<Arc<dyn FlowManager>, bool>;

/// Builds the checkout of the item carried by a [`PurchaseFlow`].
#[derive(Debug, Clone)]
pub struct CheckoutBuilder {
    registry: Registry,
}

impl CheckoutBuilder {
    #[must_use]
    pub const fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl ModuleBuilder for CheckoutBuilder {
    type Args = Arc<dyn FlowManager>;
    type Output = bool;

    fn build_module(&self, router: &SurfaceRef, flow: Self::Args) -> Option<Module<bool>> {
        let Some(flow) = downcast_flow::<PurchaseFlow>(&flow).cloned() else {
            warn!(flow = flow.flow_id(), "Checkout requires a purchase flow");
            return None;
        };

        let scope = self.registry.scope();
        scope.register_instance(flow);

        scope.register(|r| {
            let interactor = CheckoutInteractor::new(r.resolve()?, r.resolve()?, r.resolve()?, r.resolve()?);
            Some(Arc::new(interactor) as Arc<dyn CheckoutService>)
        });

        scope.register_shared(|r| {
            let service = r.resolve::<Arc<dyn CheckoutService>>()?;
            let flow = r.resolve::<PurchaseFlow>()?;
            let item = service
                .quote(flow.item())
                .inspect_err(|err| warn!(flow = flow.id(), error = %err, "Nothing to check out"))
                .ok()?;
            let config = r.resolve::<AppConfig>().unwrap_or_default();
            let outlet = Outlet::new(config.navigation.output_capacity).ok()?;
            Some(CheckoutViewModel::new(service, item, flow, &outlet))
        });

        let router = router.clone();
        scope.register(move |r| {
            let vm = r.resolve::<CheckoutViewModel>()?;
            let analytics = r.resolve::<Arc<dyn AnalyticsDispatcher>>()?;
            let animated = r.resolve::<AppConfig>().is_none_or(|c| c.navigation.animated);

            let bindings = Bindings::new()
                .bind(&vm.outputs().confirmed, CheckoutCoordinator::on_confirmed)
                .and_then(|b| b.bind(&vm.outputs().cancelled, CheckoutCoordinator::on_cancelled))
                .ok()?;

            let title = format!("Checkout: {}", vm.item().title);
            let flow = vm.flow().id().to_owned();
            let route = Route::new(router.clone(), Screen::new(title, vm).into_surface());

            Some(Module::new(CHECKOUT, CheckoutCoordinator::new(route, analytics, flow), bindings).with_animation(animated))
        });

        resolve_module(&scope)
    }
}
