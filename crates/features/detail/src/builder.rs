use crate::coordinator::{DetailCoordinator, DetailOutcome};
use crate::interactor::{DetailInteractor, DetailService};
use crate::view_model::DetailViewModel;
use std::sync::Arc;
use tracing::warn;
use wf_domain::catalog::ItemId;
use wf_domain::config::AppConfig;
use wf_domain::constants::DETAIL;
use wf_kernel::AnalyticsDispatcher;
use wf_navigation::{
    Bindings, BuilderRef, Module, ModuleBuilder, Route, Screen, SurfaceRef, ViewModel, resolve_builder,
    resolve_module,
};
use wf_registry::Registry;
use wf_signals::Outlet;

pub type DetailBuilderRef = BuilderRef<ItemId, DetailOutcome>;

#[derive(Debug, Clone)]
pub struct DetailBuilder {
    registry: Registry,
}

impl DetailBuilder {
    #[must_use]
    pub const fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl ModuleBuilder for DetailBuilder {
    type Args = ItemId;
    type Output = DetailOutcome;

    fn build_module(&self, router: &SurfaceRef, item: ItemId) -> Option<Module<DetailOutcome>> {
        let scope = self.registry.scope();
        scope.register_instance(item);

        scope.register(|r| Some(Arc::new(DetailInteractor::new(r.resolve()?, r.resolve()?)) as Arc<dyn DetailService>));

        scope.register_shared(|r| {
            let service = r.resolve::<Arc<dyn DetailService>>()?;
            let id = r.resolve::<ItemId>()?;
            let item = service.load(id).inspect_err(|err| warn!(error = %err, "Item not shown")).ok()?;
            let config = r.resolve::<AppConfig>().unwrap_or_default();
            let outlet = Outlet::new(config.navigation.output_capacity).ok()?;
            Some(DetailViewModel::new(item, &outlet))
        });

        let router = router.clone();
        scope.register(move |r| {
            let vm = r.resolve::<DetailViewModel>()?;
            let analytics = r.resolve::<Arc<dyn AnalyticsDispatcher>>()?;
            let animated = r.resolve::<AppConfig>().is_none_or(|c| c.navigation.animated);
            // Optional: without checkout the item is shown but cannot be bought.
            let checkout = resolve_builder(r);

            let bindings = Bindings::new()
                .bind(&vm.outputs().buy_requested, DetailCoordinator::on_buy_requested)
                .and_then(|b| b.bind(&vm.outputs().closed, DetailCoordinator::on_closed))
                .ok()?;

            let id = vm.item().id;
            let route = Route::new(router.clone(), Screen::new(vm.headline(), vm).into_surface());
            Some(Module::new(DETAIL, DetailCoordinator::new(route, id, checkout, analytics), bindings).with_animation(animated))
        });

        resolve_module(&scope)
    }
}
