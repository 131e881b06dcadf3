use wf_domain::catalog::ItemId;
use wf_kernel::{InMemoryItemRepository, InMemoryOrderBook, ItemRepository, OrderBook};

#[test]
fn sample_catalog_finds_items_by_id() {
    let repository = InMemoryItemRepository::sample();
    assert_eq!(repository.items().len(), 3);
    assert_eq!(repository.item(ItemId(2)).map(|i| i.title), Some("Compass".to_owned()));
    assert!(repository.item(ItemId(42)).is_none());
}

#[test]
fn order_book_keeps_placed_orders() {
    let book = InMemoryOrderBook::new();
    let first = book.place(ItemId(1), "flow-a");
    let second = book.place(ItemId(3), "flow-a");

    assert_ne!(first.id, second.id);
    let orders = book.orders();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].item, ItemId(3));
    assert_eq!(orders[0].flow, "flow-a");
}
