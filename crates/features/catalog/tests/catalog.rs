use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use wf_catalog::{CATALOG_TITLE, CatalogBuilderRef, CatalogOutcome, CatalogViewModel};
use wf_checkout::CheckoutViewModel;
use wf_detail::DetailViewModel;
use wf_domain::catalog::ItemId;
use wf_kernel::{
    AnalyticsDispatcher, InMemoryItemRepository, InMemoryOrderBook, ItemRepository, MemoryAnalytics, OrderBook,
};
use wf_navigation::testing::RecordingSurface;
use wf_navigation::{CoordinatorState, PresentationSurface, Screen, ViewModel, resolve_builder};
use wf_registry::Registry;
use wf_signals::NotificationCenter;

struct Harness {
    registry: Registry,
    analytics: Arc<MemoryAnalytics>,
    root: Arc<RecordingSurface>,
}

impl Harness {
    fn new() -> Self {
        let registry = Registry::new();
        let analytics = Arc::new(MemoryAnalytics::new());

        registry.register_instance::<Arc<dyn AnalyticsDispatcher>>(analytics.clone());
        registry.register_instance(NotificationCenter::new());
        registry.register_instance::<Arc<dyn ItemRepository>>(Arc::new(InMemoryItemRepository::sample()));
        registry.register_instance::<Arc<dyn OrderBook>>(Arc::new(InMemoryOrderBook::new()));
        wf_checkout::register(&registry);
        wf_detail::register(&registry);
        wf_catalog::register(&registry);

        Self { registry, analytics, root: RecordingSurface::new("root") }
    }

    fn builder(&self) -> CatalogBuilderRef {
        resolve_builder(&self.registry).unwrap()
    }

    async fn wait_for_top<V: ViewModel>(&self) -> Arc<Screen<V>> {
        for _ in 0..200 {
            if let Some(top) = self.root.top() {
                let top: Arc<dyn Any + Send + Sync> = top.into_any();
                if let Ok(screen) = top.downcast::<Screen<V>>() {
                    return screen;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{} never reached the top", std::any::type_name::<V>());
    }
}

#[tokio::test]
async fn purchases_are_collected_until_the_catalog_closes() {
    let harness = Harness::new();
    let running = harness.builder().build_module(&harness.root.router(), ()).unwrap().start().unwrap();
    assert!(running.wait_for(CoordinatorState::Active).await);

    let catalog = harness.wait_for_top::<CatalogViewModel>().await;
    assert_eq!(catalog.title(), CATALOG_TITLE);
    assert_eq!(catalog.view_model().items().len(), 3);

    for id in [3, 1] {
        catalog.view_model().inputs().select.send(ItemId(id));
        harness.wait_for_top::<DetailViewModel>().await.view_model().inputs().buy.trigger();
        harness.wait_for_top::<CheckoutViewModel>().await.view_model().inputs().confirm.trigger();
        harness.wait_for_top::<CatalogViewModel>().await;
    }

    catalog.view_model().inputs().close.trigger();

    assert_eq!(running.outcome().await, Some(CatalogOutcome { purchases: 2, bought: vec![ItemId(3), ItemId(1)] }));
    assert!(harness.root.presented().is_empty());
    assert_eq!(harness.analytics.names().first().map(String::as_str), Some("catalog_opened"));
    assert_eq!(harness.analytics.names().last().map(String::as_str), Some("catalog_closed"));
}

#[tokio::test]
async fn a_closed_detail_is_not_a_purchase() {
    let harness = Harness::new();
    let running = harness.builder().build_module(&harness.root.router(), ()).unwrap().start().unwrap();

    let catalog = harness.wait_for_top::<CatalogViewModel>().await;
    catalog.view_model().inputs().select.send(ItemId(2));
    harness.wait_for_top::<DetailViewModel>().await.view_model().inputs().close.trigger();
    harness.wait_for_top::<CatalogViewModel>().await.view_model().inputs().close.trigger();

    assert_eq!(running.outcome().await, Some(CatalogOutcome::default()));
}

#[tokio::test]
async fn an_unknown_item_keeps_the_catalog_on_top() {
    let harness = Harness::new();
    let running = harness.builder().build_module(&harness.root.router(), ()).unwrap().start().unwrap();

    let catalog = harness.wait_for_top::<CatalogViewModel>().await;
    catalog.view_model().inputs().select.send(ItemId(99));
    catalog.view_model().inputs().close.trigger();

    assert_eq!(running.outcome().await, Some(CatalogOutcome::default()));
    let titles: Vec<_> = harness.root.calls().iter().map(|c| c.title().to_owned()).collect();
    assert_eq!(titles, [CATALOG_TITLE, CATALOG_TITLE]);
}

#[tokio::test]
async fn only_one_detail_opens_at_a_time() {
    let harness = Harness::new();
    let running = harness.builder().build_module(&harness.root.router(), ()).unwrap().start().unwrap();

    let catalog = harness.wait_for_top::<CatalogViewModel>().await;
    catalog.view_model().inputs().select.send(ItemId(1));
    catalog.view_model().inputs().select.send(ItemId(2));

    let detail = harness.wait_for_top::<DetailViewModel>().await;
    assert_eq!(harness.root.presented(), [CATALOG_TITLE, "Trail map (12.00)"]);

    detail.view_model().inputs().close.trigger();
    harness.wait_for_top::<CatalogViewModel>().await;
    drop(running);
}

#[tokio::test]
async fn cancelling_the_catalog_tears_down_the_open_detail() {
    let harness = Harness::new();
    let running = harness.builder().build_module(&harness.root.router(), ()).unwrap().start().unwrap();

    harness.wait_for_top::<CatalogViewModel>().await.view_model().inputs().select.send(ItemId(2));
    let detail = harness.wait_for_top::<DetailViewModel>().await;

    running.cancel();
    assert!(running.wait_for(CoordinatorState::Cancelled).await);

    // The torn down detail no longer reacts.
    detail.view_model().inputs().buy.trigger();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!harness.analytics.names().iter().any(|n| n == "checkout_started"));
    assert_eq!(running.outcome().await, None);
}

#[test]
fn an_empty_catalog_builds_nothing() {
    let harness = Harness::new();
    harness.registry.register_instance::<Arc<dyn ItemRepository>>(Arc::new(InMemoryItemRepository::default()));
    assert!(harness.builder().build_module(&harness.root.router(), ()).is_none());
}
