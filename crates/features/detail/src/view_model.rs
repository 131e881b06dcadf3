use wf_domain::catalog::{Item, ItemId};
use wf_signals::{Input, Outlet, Output};

#[derive(Debug)]
pub struct DetailInputs {
    pub buy: Input<()>,
    pub close: Input<()>,
}

#[derive(Debug)]
pub struct DetailOutputs {
    pub buy_requested: Output<ItemId>,
    pub closed: Output<()>,
}

/// Shows one item.
#[wf_derive::view_model(inputs = DetailInputs, outputs = DetailOutputs)]
pub struct DetailViewModel {
    inputs: DetailInputs,
    outputs: DetailOutputs,
    item: Item,
}

impl DetailViewModel {
    pub fn new(item: Item, outlet: &Outlet) -> Self {
        let (buy_tx, buy_requested) = outlet.channel::<ItemId>();
        let (closed_tx, closed) = outlet.channel::<()>();
        let id = item.id;

        Self::from_state(DetailViewModelState {
            inputs: DetailInputs {
                buy: Input::new(move |()| {
                    buy_tx.emit(id);
                }),
                close: Input::new(move |()| {
                    closed_tx.emit(());
                }),
            },
            outputs: DetailOutputs { buy_requested, closed },
            item,
        })
    }

    #[must_use]
    pub fn item(&self) -> &Item {
        &self.state.item
    }

    /// Headline shown by the screen, e.g. `Compass (24.50)`.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{} ({})", self.state.item.title, self.state.item.price())
    }
}
