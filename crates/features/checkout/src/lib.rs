//! Checkout feature slice.
//!
//! Started by another feature with a [`PurchaseFlow`] token, it lets the user
//! confirm or abandon the purchase. Its module completes with `true` once the
//! order is recorded (and [`PurchaseCompleted`] is posted on the
//! notification center), with `false` when abandoned.

mod builder;
mod coordinator;
mod error;
mod flow;
mod interactor;
mod view_model;

pub use builder::{CheckoutBuilder, CheckoutBuilderRef};
pub use coordinator::CheckoutCoordinator;
pub use error::{CheckoutError, CheckoutErrorExt};
pub use flow::PurchaseFlow;
pub use interactor::{CheckoutInteractor, CheckoutService, PurchaseCompleted};
pub use view_model::{CheckoutInputs, CheckoutOutputs, CheckoutViewModel, CheckoutViewModelState};

use std::sync::Arc;
use tracing::debug;
use wf_registry::Registry;

/// Registers the checkout builder into the process registry.
///
/// Requires `Arc<dyn ItemRepository>`, `Arc<dyn OrderBook>`,
/// `NotificationCenter` and `Arc<dyn AnalyticsDispatcher>` at build time.
pub fn register(registry: &Registry) {
    registry.register::<CheckoutBuilderRef, _>(|r| Some(Arc::new(CheckoutBuilder::new(r.clone())) as CheckoutBuilderRef));
    debug!("Checkout feature registered");
}
