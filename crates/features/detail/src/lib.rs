//! Item detail feature slice.
//!
//! Built with the [`ItemId`](wf_domain::catalog::ItemId) to show. Buying
//! starts the checkout feature as a child; the module completes with a
//! [`DetailOutcome`] when the user closes the item or a purchase completes.

mod builder;
mod coordinator;
mod error;
mod interactor;
mod view_model;

pub use builder::{DetailBuilder, DetailBuilderRef};
pub use coordinator::{DetailCoordinator, DetailOutcome};
pub use error::{DetailError, DetailErrorExt};
pub use interactor::{DetailInteractor, DetailService};
pub use view_model::{DetailInputs, DetailOutputs, DetailViewModel, DetailViewModelState};

use std::sync::Arc;
use tracing::debug;
use wf_registry::Registry;

/// Registers the detail builder into the process registry.
pub fn register(registry: &Registry) {
    registry.register::<DetailBuilderRef, _>(|r| Some(Arc::new(DetailBuilder::new(r.clone())) as DetailBuilderRef));
    debug!("Detail feature registered");
}
