use wf_domain::catalog::{Item, ItemId};
use wf_signals::{Input, Outlet, Output};

#[derive(Debug)]
pub struct CatalogInputs {
    pub select: Input<ItemId>,
    pub close: Input<()>,
}

#[derive(Debug)]
pub struct CatalogOutputs {
    pub item_selected: Output<ItemId>,
    pub closed: Output<()>,
}

/// Lists the catalog.
#[wf_derive::view_model(inputs = CatalogInputs, outputs = CatalogOutputs)]
pub struct CatalogViewModel {
    inputs: CatalogInputs,
    outputs: CatalogOutputs,
    items: Vec<Item>,
}

impl CatalogViewModel {
    pub fn new(items: Vec<Item>, outlet: &Outlet) -> Self {
        let (selected_tx, item_selected) = outlet.channel::<ItemId>();
        let (closed_tx, closed) = outlet.channel::<()>();

        Self::from_state(CatalogViewModelState {
            inputs: CatalogInputs {
                select: Input::new(move |id| {
                    selected_tx.emit(id);
                }),
                close: Input::new(move |()| {
                    closed_tx.emit(());
                }),
            },
            outputs: CatalogOutputs { item_selected, closed },
            items,
        })
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    /// One `#id title price` line per item.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.state.items.iter().map(|item| format!("{} {} {}", item.id, item.title, item.price())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_navigation::ViewModel;

    #[tokio::test]
    async fn selection_is_forwarded_verbatim() {
        let vm = CatalogViewModel::new(vec![Item::new(1, "Trail map", 1_200)], &Outlet::new(4).unwrap());
        let mut selected = vm.outputs().item_selected.subscribe();

        // Unknown ids are forwarded too; the detail builder rejects them.
        vm.inputs().select.send(ItemId(9));

        assert_eq!(*selected.recv().await.unwrap(), ItemId(9));
        assert_eq!(vm.lines(), ["#1 Trail map 12.00"]);
    }
}
