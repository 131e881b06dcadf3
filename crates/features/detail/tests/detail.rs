use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use wf_checkout::CheckoutViewModel;
use wf_detail::{DetailBuilderRef, DetailOutcome, DetailViewModel};
use wf_domain::catalog::ItemId;
use wf_kernel::{
    AnalyticsDispatcher, InMemoryItemRepository, InMemoryOrderBook, ItemRepository, MemoryAnalytics, OrderBook,
};
use wf_navigation::testing::RecordingSurface;
use wf_navigation::{PresentationSurface, Screen, ViewModel, resolve_builder};
use wf_registry::Registry;
use wf_signals::NotificationCenter;

struct Harness {
    registry: Registry,
    orders: Arc<InMemoryOrderBook>,
    analytics: Arc<MemoryAnalytics>,
    root: Arc<RecordingSurface>,
}

impl Harness {
    fn new(with_checkout: bool) -> Self {
        let registry = Registry::new();
        let orders = Arc::new(InMemoryOrderBook::new());
        let analytics = Arc::new(MemoryAnalytics::new());

        registry.register_instance::<Arc<dyn AnalyticsDispatcher>>(analytics.clone());
        registry.register_instance(NotificationCenter::new());
        registry.register_instance::<Arc<dyn ItemRepository>>(Arc::new(InMemoryItemRepository::sample()));
        registry.register_instance::<Arc<dyn OrderBook>>(orders.clone());
        if with_checkout {
            wf_checkout::register(&registry);
        }
        wf_detail::register(&registry);

        Self { registry, orders, analytics, root: RecordingSurface::new("root") }
    }

    fn builder(&self) -> DetailBuilderRef {
        resolve_builder(&self.registry).unwrap()
    }

    fn top<V: ViewModel>(&self) -> Option<Arc<Screen<V>>> {
        let top: Arc<dyn Any + Send + Sync> = self.root.top()?.into_any();
        top.downcast::<Screen<V>>().ok()
    }

    /// Waits for a screen of `V` to reach the top of the recorded hierarchy.
    async fn wait_for_top<V: ViewModel>(&self) -> Arc<Screen<V>> {
        for _ in 0..200 {
            if let Some(screen) = self.top::<V>() {
                return screen;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{} never reached the top", std::any::type_name::<V>());
    }

    fn titles(&self) -> Vec<String> {
        self.root.calls().iter().map(|c| c.title().to_owned()).collect()
    }
}

#[tokio::test]
async fn a_confirmed_purchase_leaves_the_item() {
    let harness = Harness::new(true);
    let running = harness.builder().build_module(&harness.root.router(), ItemId(2)).unwrap().start().unwrap();

    let detail = harness.wait_for_top::<DetailViewModel>().await;
    assert_eq!(detail.title(), "Compass (24.50)");
    detail.view_model().inputs().buy.trigger();

    let checkout = harness.wait_for_top::<CheckoutViewModel>().await;
    checkout.view_model().inputs().confirm.trigger();

    assert_eq!(running.outcome().await, Some(DetailOutcome { item: ItemId(2), purchased: true }));
    assert_eq!(harness.orders.orders().len(), 1);
    assert_eq!(harness.titles(), ["Compass (24.50)", "Checkout: Compass", "Checkout: Compass", "Compass (24.50)"]);
    assert!(harness.root.presented().is_empty());
}

#[tokio::test]
async fn an_abandoned_checkout_stays_on_the_item() {
    let harness = Harness::new(true);
    let running = harness.builder().build_module(&harness.root.router(), ItemId(1)).unwrap().start().unwrap();

    harness.wait_for_top::<DetailViewModel>().await.view_model().inputs().buy.trigger();
    harness.wait_for_top::<CheckoutViewModel>().await.view_model().inputs().cancel.trigger();

    let detail = harness.wait_for_top::<DetailViewModel>().await;
    assert_eq!(harness.root.presented(), ["Trail map (12.00)"]);

    detail.view_model().inputs().close.trigger();
    assert_eq!(running.outcome().await, Some(DetailOutcome { item: ItemId(1), purchased: false }));
    assert!(harness.orders.orders().is_empty());

    let names = harness.analytics.names();
    assert!(names.iter().any(|n| n == "checkout_started"));
    assert!(names.iter().any(|n| n == "checkout_cancelled"));
}

#[tokio::test]
async fn closing_completes_without_a_purchase() {
    let harness = Harness::new(true);
    let running = harness.builder().build_module(&harness.root.router(), ItemId(3)).unwrap().start().unwrap();

    harness.wait_for_top::<DetailViewModel>().await.view_model().inputs().close.trigger();

    assert_eq!(running.outcome().await, Some(DetailOutcome { item: ItemId(3), purchased: false }));
    assert_eq!(harness.analytics.names(), ["item_viewed"]);
}

#[test]
fn an_unknown_item_builds_nothing() {
    let harness = Harness::new(true);
    assert!(harness.builder().build_module(&harness.root.router(), ItemId(404)).is_none());
    assert!(harness.root.calls().is_empty());
}

#[tokio::test]
async fn without_checkout_buying_does_nothing() {
    let harness = Harness::new(false);
    let running = harness.builder().build_module(&harness.root.router(), ItemId(2)).unwrap().start().unwrap();

    let detail = harness.wait_for_top::<DetailViewModel>().await;
    detail.view_model().inputs().buy.trigger();
    detail.view_model().inputs().close.trigger();

    // Reactions run in order: the close is only seen after the ignored buy.
    assert_eq!(running.outcome().await, Some(DetailOutcome { item: ItemId(2), purchased: false }));
    assert_eq!(harness.titles(), ["Compass (24.50)", "Compass (24.50)"]);
}
