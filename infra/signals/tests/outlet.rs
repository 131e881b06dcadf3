use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wf_signals::{Input, Outlet, completion};

#[derive(Debug, PartialEq, Eq)]
struct ItemSelected(u32);

#[derive(Debug, PartialEq, Eq)]
struct Closed;

/// A minimal view-model: intents in, navigation events out.
struct ListViewModel {
    select: Input<u32>,
    close: Input<()>,
    outlet: Outlet,
    selected: wf_signals::Output<ItemSelected>,
    closed: wf_signals::Output<Closed>,
}

fn list_view_model() -> ListViewModel {
    let outlet = Outlet::new(8).unwrap();
    let (selected_tx, selected) = outlet.channel::<ItemSelected>();
    let (closed_tx, closed) = outlet.channel::<Closed>();

    ListViewModel {
        select: Input::new(move |id| {
            selected_tx.emit(ItemSelected(id));
        }),
        close: Input::new(move |()| {
            closed_tx.emit(Closed);
        }),
        outlet,
        selected,
        closed,
    }
}

#[tokio::test]
async fn inputs_drive_outputs_without_a_coordinator() {
    let vm = list_view_model();
    let mut selected = vm.selected.subscribe();
    let mut closed = vm.closed.subscribe();

    vm.select.send(11);
    vm.close.trigger();

    assert_eq!(*selected.recv().await.unwrap(), ItemSelected(11));
    assert_eq!(*closed.recv().await.unwrap(), Closed);
}

#[tokio::test]
async fn observer_sees_outputs_in_emission_order() {
    let vm = list_view_model();
    let mut all = vm.outlet.subscribe_all();

    vm.select.send(1);
    vm.close.trigger();
    vm.select.send(2);

    let first = all.next().await.unwrap();
    assert_eq!(first.downcast::<ItemSelected>().as_deref(), Some(&ItemSelected(1)));
    let second = all.next().await.unwrap();
    assert_eq!(second.slot(), vm.closed.slot());
    assert!(second.downcast::<ItemSelected>().is_none());
    let third = all.next().await.unwrap();
    assert_eq!(third.downcast::<ItemSelected>().as_deref(), Some(&ItemSelected(2)));
}

#[tokio::test]
async fn outlet_closes_when_every_handle_is_dropped() {
    let outlet = Outlet::new(4).unwrap();
    let (emitter, output) = outlet.channel::<Closed>();
    let mut stream = output.subscribe();
    drop((outlet, emitter, output));

    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn completion_is_single_shot_across_tasks() {
    let (completer, done) = completion::<bool>();
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&attempts);
    tokio::spawn(async move {
        counter.fetch_add(1, Ordering::SeqCst);
        completer.complete(true);
    });

    assert_eq!(done.wait().await, Some(true));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}
