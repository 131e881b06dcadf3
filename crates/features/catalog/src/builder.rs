use crate::coordinator::{CatalogCoordinator, CatalogOutcome};
use crate::interactor::{CatalogInteractor, CatalogService};
use crate::view_model::CatalogViewModel;
use std::sync::Arc;
use tracing::warn;
use wf_domain::config::AppConfig;
use wf_domain::constants::CATALOG;
use wf_kernel::AnalyticsDispatcher;
use wf_navigation::{
    Bindings, BuilderRef, Module, ModuleBuilder, Route, Screen, SurfaceRef, ViewModel, resolve_builder,
    resolve_module,
};
use wf_registry::Registry;
use wf_signals::Outlet;

pub type CatalogBuilderRef = BuilderRef<(), CatalogOutcome>;

pub const CATALOG_TITLE: &str = "Catalog";

#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    registry: Registry,
}

impl CatalogBuilder {
    #[must_use]
    pub const fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl ModuleBuilder for CatalogBuilder {
    type Args = ();
    type Output = CatalogOutcome;

    fn build_module(&self, router: &SurfaceRef, (): ()) -> Option<Module<CatalogOutcome>> {
        let scope = self.registry.scope();

        scope.register(|r| Some(Arc::new(CatalogInteractor::new(r.resolve()?)) as Arc<dyn CatalogService>));

        scope.register_shared(|r| {
            let service = r.resolve::<Arc<dyn CatalogService>>()?;
            let items = service.items().inspect_err(|err| warn!(error = %err, "Catalog not shown")).ok()?;
            let config = r.resolve::<AppConfig>().unwrap_or_default();
            let outlet = Outlet::new(config.navigation.output_capacity).ok()?;
            Some(CatalogViewModel::new(items, &outlet))
        });

        let router = router.clone();
        scope.register(move |r| {
            let vm = r.resolve::<CatalogViewModel>()?;
            let analytics = r.resolve::<Arc<dyn AnalyticsDispatcher>>()?;
            let animated = r.resolve::<AppConfig>().is_none_or(|c| c.navigation.animated);
            let detail = resolve_builder(r);

            let bindings = Bindings::new()
                .bind(&vm.outputs().item_selected, CatalogCoordinator::on_item_selected)
                .and_then(|b| b.bind(&vm.outputs().closed, CatalogCoordinator::on_closed))
                .ok()?;

            let route = Route::new(router.clone(), Screen::new(CATALOG_TITLE, vm).into_surface());
            Some(Module::new(CATALOG, CatalogCoordinator::new(route, detail, analytics), bindings).with_animation(animated))
        });

        resolve_module(&scope)
    }
}
