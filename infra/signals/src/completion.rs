use std::any::type_name;
use std::fmt;
use tokio::sync::oneshot;
use tracing::trace;

/// Creates a single-shot result channel.
///
/// The value is delivered at most once: [`Completer::complete`] consumes the
/// completer, and dropping it without completing resolves the
/// [`Completion`] to `None`.
#[must_use]
pub fn completion<T>() -> (Completer<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    (Completer { tx }, Completion { rx })
}

/// The producing half of a single-shot result.
pub struct Completer<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Completer<T> {
    /// Delivers `value`. Returns `false` if nobody is waiting any more.
    pub fn complete(self, value: T) -> bool {
        let delivered = self.tx.send(value).is_ok();
        trace!(result = type_name::<T>(), delivered, "Completion delivered");
        delivered
    }

    /// Whether the waiting side has been dropped.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

impl<T> fmt::Debug for Completer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("result", &type_name::<T>())
            .field("abandoned", &self.tx.is_closed())
            .finish()
    }
}

/// The waiting half of a single-shot result.
pub struct Completion<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Completion<T> {
    /// Resolves to the delivered value, or `None` if the producer was released
    /// without completing.
    pub async fn wait(self) -> Option<T> {
        self.rx.await.ok()
    }

    /// Takes the value if it has already been delivered.
    pub fn try_take(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").field("result", &type_name::<T>()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_exactly_one_value() {
        let (completer, completion) = completion::<bool>();
        assert!(completer.complete(true));
        assert_eq!(completion.wait().await, Some(true));
    }

    #[tokio::test]
    async fn dropped_completer_resolves_to_none() {
        let (completer, completion) = completion::<u8>();
        drop(completer);
        assert_eq!(completion.wait().await, None);
    }

    #[test]
    fn abandoned_when_waiter_is_gone() {
        let (completer, completion) = completion::<u8>();
        drop(completion);
        assert!(completer.is_abandoned());
        assert!(!completer.complete(1));
    }

    #[test]
    fn try_take_before_and_after_delivery() {
        let (completer, mut completion) = completion::<&str>();
        assert_eq!(completion.try_take(), None);
        completer.complete("done");
        assert_eq!(completion.try_take(), Some("done"));
    }
}
