use crate::safe_nanoid;
use parking_lot::RwLock;
use std::fmt::Debug;
use tracing::debug;
use wf_domain::catalog::{Item, ItemId, Order};

/// Read access to the item catalog.
pub trait ItemRepository: Debug + Send + Sync {
    fn items(&self) -> Vec<Item>;

    fn item(&self, id: ItemId) -> Option<Item> {
        self.items().into_iter().find(|item| item.id == id)
    }
}

/// Records confirmed purchases.
pub trait OrderBook: Debug + Send + Sync {
    fn place(&self, item: ItemId, flow: &str) -> Order;

    fn orders(&self) -> Vec<Order>;
}

#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: Vec<Item>,
}

impl InMemoryItemRepository {
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// A small fixed catalog used by the shell and the tests.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(vec![
            Item::new(1, "Trail map", 1_200),
            Item::new(2, "Compass", 2_450),
            Item::new(3, "Headlamp", 3_999),
        ])
    }
}

impl ItemRepository for InMemoryItemRepository {
    fn items(&self) -> Vec<Item> {
        self.items.clone()
    }

    fn item(&self, id: ItemId) -> Option<Item> {
        self.items.iter().find(|item| item.id == id).cloned()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOrderBook {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderBook for InMemoryOrderBook {
    fn place(&self, item: ItemId, flow: &str) -> Order {
        let order = Order { id: safe_nanoid!(), item, flow: flow.to_owned() };
        debug!(order = %order.id, %item, flow, "Order placed");
        self.orders.write().push(order.clone());
        order
    }

    fn orders(&self) -> Vec<Order> {
        self.orders.read().clone()
    }
}
