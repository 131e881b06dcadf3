use crate::error::CheckoutError;
use crate::flow::PurchaseFlow;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::info;
use wf_domain::catalog::{Item, ItemId, Order};
use wf_kernel::{AnalyticsDispatcher, AnalyticsEvent, ItemRepository, OrderBook};
use wf_signals::NotificationCenter;

/// Posted on the [`NotificationCenter`] after every confirmed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseCompleted {
    pub order: Order,
    pub title: String,
}

/// Business operations behind the checkout screen.
pub trait CheckoutService: Debug + Send + Sync {
    /// The item as it will be bought.
    ///
    /// # Errors
    /// Returns [`CheckoutError::Unavailable`] for unknown items.
    fn quote(&self, item: ItemId) -> Result<Item, CheckoutError>;

    /// Records the order and announces it.
    ///
    /// # Errors
    /// Returns [`CheckoutError::Notification`] if the announcement cannot be posted.
    fn purchase(&self, item: &Item, flow: &PurchaseFlow) -> Result<Order, CheckoutError>;
}

#[derive(Debug)]
pub struct CheckoutInteractor {
    items: Arc<dyn ItemRepository>,
    orders: Arc<dyn OrderBook>,
    notifications: NotificationCenter,
    analytics: Arc<dyn AnalyticsDispatcher>,
}

impl CheckoutInteractor {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        orders: Arc<dyn OrderBook>,
        notifications: NotificationCenter,
        analytics: Arc<dyn AnalyticsDispatcher>,
    ) -> Self {
        Self { items, orders, notifications, analytics }
    }
}

impl CheckoutService for CheckoutInteractor {
    fn quote(&self, item: ItemId) -> Result<Item, CheckoutError> {
        self.items.item(item).ok_or_else(|| CheckoutError::Unavailable {
            message: item.to_string().into(),
            context: Some("Quote".into()),
        })
    }

    fn purchase(&self, item: &Item, flow: &PurchaseFlow) -> Result<Order, CheckoutError> {
        let order = self.orders.place(item.id, flow.id());
        info!(order = %order.id, item = %item.id, flow = flow.id(), "Purchase confirmed");

        self.notifications.post(PurchaseCompleted { order: order.clone(), title: item.title.clone() })?;
        self.analytics.track(
            AnalyticsEvent::new("purchase_completed")
                .with("item", item.id)
                .with("order", &order.id)
                .with("origin", flow.origin()),
        );

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_kernel::{InMemoryItemRepository, InMemoryOrderBook, MemoryAnalytics};

    #[tokio::test]
    async fn purchase_records_and_announces_the_order() {
        let orders = Arc::new(InMemoryOrderBook::new());
        let analytics = Arc::new(MemoryAnalytics::new());
        let notifications = NotificationCenter::new();
        let mut completed = notifications.observe::<PurchaseCompleted>().unwrap();

        let interactor = CheckoutInteractor::new(
            Arc::new(InMemoryItemRepository::sample()),
            orders.clone(),
            notifications,
            analytics.clone(),
        );

        let item = interactor.quote(ItemId(2)).unwrap();
        let flow = PurchaseFlow::new(item.id, "detail");
        let order = interactor.purchase(&item, &flow).unwrap();

        assert_eq!(order.flow, flow.id());
        assert_eq!(orders.orders(), [order.clone()]);
        assert_eq!(completed.recv().await.unwrap().order, order);
        assert_eq!(analytics.names(), ["purchase_completed"]);
    }

    #[test]
    fn unknown_items_cannot_be_quoted() {
        let interactor = CheckoutInteractor::new(
            Arc::new(InMemoryItemRepository::default()),
            Arc::new(InMemoryOrderBook::new()),
            NotificationCenter::new(),
            Arc::new(MemoryAnalytics::new()),
        );
        assert!(matches!(interactor.quote(ItemId(9)), Err(CheckoutError::Unavailable { .. })));
    }
}
