use crate::flow::PurchaseFlow;
use crate::interactor::CheckoutService;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};
use wf_domain::catalog::{Item, Order};
use wf_signals::{Input, Outlet, Output};

#[derive(Debug)]
pub struct CheckoutInputs {
    pub confirm: Input<()>,
    pub cancel: Input<()>,
}

#[derive(Debug)]
pub struct CheckoutOutputs {
    /// The order was placed.
    pub confirmed: Output<Order>,
    pub cancelled: Output<()>,
}

#[derive(Debug, Default)]
struct Progress {
    order: Option<Order>,
    error: Option<String>,
}

/// Confirms or abandons the purchase of one item.
#[wf_derive::view_model(inputs = CheckoutInputs, outputs = CheckoutOutputs)]
pub struct CheckoutViewModel {
    inputs: CheckoutInputs,
    outputs: CheckoutOutputs,
    item: Item,
    flow: PurchaseFlow,
    progress: Arc<Mutex<Progress>>,
}

impl CheckoutViewModel {
    pub fn new(service: Arc<dyn CheckoutService>, item: Item, flow: PurchaseFlow, outlet: &Outlet) -> Self {
        let (confirmed_tx, confirmed) = outlet.channel::<Order>();
        let (cancelled_tx, cancelled) = outlet.channel::<()>();
        let progress = Arc::new(Mutex::new(Progress::default()));

        let confirm = {
            let (item, flow, progress) = (item.clone(), flow.clone(), Arc::clone(&progress));
            Input::new(move |()| {
                let mut progress = progress.lock();
                if progress.order.is_some() {
                    debug!(flow = flow.id(), "Purchase already confirmed");
                    return;
                }
                match service.purchase(&item, &flow) {
                    Ok(order) => {
                        progress.order = Some(order.clone());
                        progress.error = None;
                        drop(progress);
                        confirmed_tx.emit(order);
                    },
                    Err(err) => {
                        warn!(flow = flow.id(), error = %err, "Purchase failed");
                        progress.error = Some(err.to_string());
                    },
                }
            })
        };
        let cancel = Input::new(move |()| {
            cancelled_tx.emit(());
        });

        Self::from_state(CheckoutViewModelState {
            inputs: CheckoutInputs { confirm, cancel },
            outputs: CheckoutOutputs { confirmed, cancelled },
            item,
            flow,
            progress,
        })
    }

    #[must_use]
    pub fn item(&self) -> &Item {
        &self.state.item
    }

    #[must_use]
    pub fn flow(&self) -> &PurchaseFlow {
        &self.state.flow
    }

    /// The placed order, once confirmed.
    #[must_use]
    pub fn order(&self) -> Option<Order> {
        self.state.progress.lock().order.clone()
    }

    /// Why the last confirmation failed, if it did.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state.progress.lock().error.clone()
    }
}
