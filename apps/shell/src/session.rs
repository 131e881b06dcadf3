use crate::script::Intent;
use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wayfinder::App;
use wayfinder::domain::catalog::{ItemId, Order};
use wayfinder::features::catalog::{CatalogOutcome, CatalogViewModel};
use wayfinder::features::checkout::{CheckoutViewModel, PurchaseCompleted};
use wayfinder::features::detail::DetailViewModel;
use wayfinder::navigation::{CoordinatorState, Running, Stage, ViewModel};
use wayfinder::signals::EventReceiverExt;

/// What a replayed session did, as printed by `--json`.
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct SessionReport {
    pub(crate) completed: bool,
    pub(crate) purchases: usize,
    pub(crate) bought: Vec<ItemId>,
    pub(crate) orders: Vec<Order>,
    pub(crate) receipts: Vec<String>,
    pub(crate) transitions: Vec<String>,
    pub(crate) skipped: Vec<String>,
}

/// Replays `intents` against the catalog running on a headless stage.
///
/// Each intent goes to the screen on top of the stage; an intent that screen
/// does not understand is skipped and reported. `settle` is how long
/// coordinators get to react before the next intent.
///
/// The session owns the process: the app's notification center is closed
/// once the replay ends.
pub(crate) async fn replay(app: &App, intents: &[Intent], settle: Duration) -> SessionReport {
    let stage = Stage::new("main");
    let mut report = SessionReport::default();
    let receipts = collect_receipts(app);

    if let Some(running) = app.launch(&stage) {
        drive(&stage, running, intents, settle, &mut report).await;
    } else {
        warn!("Nothing to replay: the catalog did not launch");
    }

    app.notifications().close();
    if let Some(receipts) = receipts {
        report.receipts = receipts.await.unwrap_or_default();
    }
    report.orders = app.orders().orders();
    report.transitions = stage.transitions().iter().map(ToString::to_string).collect();
    report
}

async fn drive(
    stage: &Stage,
    running: Running<CatalogOutcome>,
    intents: &[Intent],
    settle: Duration,
    report: &mut SessionReport,
) {
    let mut seen = log_transitions(stage, 0);
    for intent in intents {
        tokio::time::sleep(settle).await;
        if dispatch(stage, *intent) {
            debug!(%intent, top = %stage.top_title(), "Intent sent");
        } else {
            warn!(%intent, top = %stage.top_title(), "Intent skipped: not understood by the top screen");
            report.skipped.push(intent.to_string());
        }
        tokio::time::sleep(settle).await;
        seen = log_transitions(stage, seen);
    }

    let completed = tokio::time::timeout(settle * 10, running.wait_for(CoordinatorState::Completed)).await;
    let outcome = match completed {
        Ok(true) => running.outcome().await,
        _ => {
            warn!(top = %stage.top_title(), "Script ended with the catalog still open; cancelling");
            running.cancel();
            None
        },
    };
    log_transitions(stage, seen);

    if let Some(CatalogOutcome { purchases, bought }) = outcome {
        info!(purchases, "Session completed");
        report.completed = true;
        report.purchases = purchases;
        report.bought = bought;
    }
}

/// Logs every completed purchase until the notification center closes.
fn collect_receipts(app: &App) -> Option<JoinHandle<Vec<String>>> {
    let mut purchases = app
        .notifications()
        .observe::<PurchaseCompleted>()
        .inspect_err(|err| warn!(error = %err, "Receipts unavailable"))
        .ok()?;

    Some(tokio::spawn(async move {
        let mut titles = Vec::new();
        while let Some(purchase) = purchases.recv_event().await {
            info!(order = %purchase.order.id, item = %purchase.title, flow = %purchase.order.flow, "Receipt");
            titles.push(purchase.title.clone());
        }
        titles
    }))
}

fn dispatch(stage: &Stage, intent: Intent) -> bool {
    if let Some(screen) = stage.top_screen::<CheckoutViewModel>() {
        let inputs = screen.view_model().inputs();
        return match intent {
            Intent::Confirm => {
                inputs.confirm.trigger();
                true
            },
            Intent::Cancel | Intent::Back => {
                inputs.cancel.trigger();
                true
            },
            _ => false,
        };
    }

    if let Some(screen) = stage.top_screen::<DetailViewModel>() {
        let inputs = screen.view_model().inputs();
        return match intent {
            Intent::Buy => {
                inputs.buy.trigger();
                true
            },
            Intent::Close | Intent::Back => {
                inputs.close.trigger();
                true
            },
            _ => false,
        };
    }

    if let Some(screen) = stage.top_screen::<CatalogViewModel>() {
        let inputs = screen.view_model().inputs();
        return match intent {
            Intent::Select(id) => {
                inputs.select.send(id);
                true
            },
            Intent::Close => {
                inputs.close.trigger();
                true
            },
            _ => false,
        };
    }

    false
}

fn log_transitions(stage: &Stage, seen: usize) -> usize {
    let transitions = stage.transitions();
    for transition in transitions.iter().skip(seen) {
        info!(%transition, depth = stage.depth(), "Stage transition");
    }
    transitions.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{DEFAULT_SCRIPT, parse};
    use wayfinder::domain::config::AppConfig;

    const SETTLE: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn the_default_script_buys_one_item() {
        let app = wayfinder::bootstrap(&AppConfig::default()).unwrap();
        let report = replay(&app, &parse(DEFAULT_SCRIPT).unwrap(), SETTLE).await;

        assert!(report.completed);
        assert_eq!(report.purchases, 1);
        assert_eq!(report.bought, [ItemId(2)]);
        assert_eq!(report.orders.len(), 1);
        assert_eq!(report.receipts, ["Compass"]);
        assert!(report.skipped.is_empty());
        assert_eq!(report.transitions.first().map(String::as_str), Some("present 'Catalog' (animated: true)"));
    }

    #[tokio::test]
    async fn misdirected_intents_are_skipped() {
        let app = wayfinder::bootstrap(&AppConfig::default()).unwrap();
        let report = replay(&app, &parse("confirm\nbuy\nclose").unwrap(), SETTLE).await;

        assert!(report.completed);
        assert_eq!(report.skipped, ["confirm", "buy"]);
        assert_eq!(report.purchases, 0);
    }

    #[tokio::test]
    async fn an_unfinished_script_cancels_the_catalog() {
        let app = wayfinder::bootstrap(&AppConfig::default()).unwrap();
        let report = replay(&app, &parse("select 1").unwrap(), SETTLE).await;

        assert!(!report.completed);
        assert!(report.orders.is_empty());
    }
}
