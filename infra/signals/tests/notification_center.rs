use std::time::Duration;
use wf_signals::{EventReceiverExt, NotificationCenter};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PurchaseCompleted {
    item: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Session(&'static str);

#[tokio::test]
async fn observers_each_receive_posted_notifications() {
    let center = NotificationCenter::new();
    let mut first = center.observe::<PurchaseCompleted>().unwrap();
    let mut second = center.clone().observe::<PurchaseCompleted>().unwrap();

    assert_eq!(center.post(PurchaseCompleted { item: 4 }).unwrap(), 2);

    assert_eq!(first.recv_event().await.unwrap().item, 4);
    assert_eq!(second.recv_event().await.unwrap().item, 4);
}

#[tokio::test]
async fn lagging_observer_resumes_from_retained_tail() {
    let center = NotificationCenter::new();
    let mut rx = center.observe_with_capacity::<PurchaseCompleted>(2).unwrap();

    for item in 0..10 {
        center.post(PurchaseCompleted { item }).unwrap();
    }

    let first = rx.recv_event().await.unwrap();
    assert!(first.item >= 8, "expected the retained tail, got {}", first.item);
    let second = rx.recv_event().await.unwrap();
    assert_eq!(second.item, first.item + 1);
}

#[tokio::test]
async fn closing_the_center_ends_observation() {
    let center = NotificationCenter::new();
    let mut rx = center.observe::<PurchaseCompleted>().unwrap();
    center.close();

    let next = tokio::time::timeout(Duration::from_millis(100), rx.recv_event()).await.unwrap();
    assert!(next.is_none());
}

#[tokio::test]
async fn latest_value_observers_see_changes() {
    let center = NotificationCenter::new();
    let mut rx = center.observe_latest(Session("anonymous")).unwrap();
    assert_eq!(**rx.borrow(), Session("anonymous"));

    center.post_latest(Session("signed-in")).unwrap();
    assert_eq!(*rx.recv_event().await.unwrap(), Session("signed-in"));
}
