use crate::module::Module;
use crate::surface::SurfaceRef;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use wf_registry::Registry;

/// Per-feature factory producing fully wired modules.
///
/// `router` is the surface the feature will present against; `args` carry the
/// dynamic data only the caller knows (an item id, a flow token). A builder
/// returns `None` instead of a partially wired module when any dependency is
/// missing, and the caller then simply does not navigate.
pub trait ModuleBuilder: fmt::Debug + Send + Sync {
    type Args;
    type Output: Send + 'static;

    fn build_module(&self, router: &SurfaceRef, args: Self::Args) -> Option<Module<Self::Output>>;
}

/// How builders are registered and resolved: keyed by their arguments and result.
pub type BuilderRef<A, R> = Arc<dyn ModuleBuilder<Args = A, Output = R>>;

/// Resolves the module a builder registered into its build scope.
///
/// Missing dependencies are logged and collapse to `None`.
#[must_use]
pub fn resolve_module<R: Send + 'static>(scope: &Registry) -> Option<Module<R>> {
    scope
        .require::<Module<R>>()
        .inspect(|module| debug!(module = %module.id(), name = module.name(), "Module built"))
        .inspect_err(|err| debug!(result = type_name::<R>(), error = %err, "Module build failed"))
        .ok()
}

/// Resolves the builder for a child feature, `None` when the feature is absent.
#[must_use]
pub fn resolve_builder<A: 'static, R: 'static>(registry: &Registry) -> Option<BuilderRef<A, R>> {
    let builder = registry.resolve::<BuilderRef<A, R>>();
    if builder.is_none() {
        debug!(builder = type_name::<BuilderRef<A, R>>(), "Feature not available");
    }
    builder
}
