//! Catalog feature slice, the root of the navigation tree.
//!
//! Lists the items of the registered [`ItemRepository`](wf_kernel::ItemRepository)
//! and opens the detail feature for a selected item. The module completes
//! with a [`CatalogOutcome`] once the catalog is closed.

mod builder;
mod coordinator;
mod error;
mod interactor;
mod view_model;

pub use builder::{CATALOG_TITLE, CatalogBuilder, CatalogBuilderRef};
pub use coordinator::{CatalogCoordinator, CatalogOutcome};
pub use error::{CatalogError, CatalogErrorExt};
pub use interactor::{CatalogInteractor, CatalogService};
pub use view_model::{CatalogInputs, CatalogOutputs, CatalogViewModel, CatalogViewModelState};

use std::sync::Arc;
use tracing::debug;
use wf_registry::Registry;

/// Registers the catalog builder into the process registry.
pub fn register(registry: &Registry) {
    registry.register::<CatalogBuilderRef, _>(|r| Some(Arc::new(CatalogBuilder::new(r.clone())) as CatalogBuilderRef));
    debug!("Catalog feature registered");
}
