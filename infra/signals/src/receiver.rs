use crate::Signal;
use std::any::type_name;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

/// Lag-tolerant receive for notification receivers.
///
/// On a broadcast receiver, overwritten notifications are skipped with a
/// warning instead of surfacing `Lagged`. On a watch receiver, waits for the
/// next change and returns the latest value.
pub trait EventReceiverExt<T> {
    /// Receive the next notification, `None` once the channel is closed.
    fn recv_event(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Signal> EventReceiverExt<T> for broadcast::Receiver<Arc<T>> {
    async fn recv_event(&mut self) -> Option<Arc<T>> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(event) => {
                    if skipped > 0 {
                        warn!(notification = type_name::<T>(), skipped, "Receiver lagged; continuing from oldest retained notification");
                    }
                    return Some(event);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(notification = type_name::<T>(), skipped = n, total_skipped = skipped, "Receiver lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl<T: Signal> EventReceiverExt<T> for watch::Receiver<Arc<T>> {
    async fn recv_event(&mut self) -> Option<Arc<T>> {
        self.changed().await.ok()?;
        Some(Arc::clone(&self.borrow_and_update()))
    }
}
