use crate::Signal;
use crate::error::SignalError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{trace, warn};

const DEFAULT_CAPACITY: usize = 128;

/// Channel kinds a notification type can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Fan-out of every posted value.
    Broadcast { capacity: usize },
    /// Only the latest posted value is retained.
    Latest,
}

#[derive(Debug)]
struct Channel {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

/// Process-wide, type-keyed notification bus.
///
/// Each notification type is bound to one channel kind on first use; later
/// use with the other kind fails with [`SignalError::ChannelKindMismatch`].
/// The center is a cheap clonable handle, registered once at startup.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    channels: Arc<RwLock<FxHashMap<TypeId, Channel>>>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes every future notification of type `T`.
    ///
    /// # Errors
    /// Returns [`SignalError::ChannelKindMismatch`] if `T` is a latest-value notification.
    pub fn observe<T: Signal>(&self) -> Result<broadcast::Receiver<Arc<T>>, SignalError> {
        self.observe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Like [`NotificationCenter::observe`], sizing the buffer on first use.
    ///
    /// # Errors
    /// Returns [`SignalError::InvalidCapacity`] if `capacity` is zero, or
    /// [`SignalError::ChannelKindMismatch`] if `T` is a latest-value notification.
    pub fn observe_with_capacity<T: Signal>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, SignalError> {
        if capacity == 0 {
            return Err(SignalError::InvalidCapacity {
                message: "capacity must be >= 1".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Posts a notification to every current observer of `T`.
    ///
    /// Returns the number of observers reached.
    ///
    /// # Errors
    /// Returns [`SignalError::ChannelKindMismatch`] if `T` is a latest-value notification.
    pub fn post<T: Signal>(&self, notification: T) -> Result<usize, SignalError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        Ok(sender.send(Arc::new(notification)).map_or_else(
            |_| {
                trace!(notification = type_name::<T>(), "Notification dropped: no observers");
                0
            },
            |count| {
                trace!(notification = type_name::<T>(), count, "Notification posted");
                count
            },
        ))
    }

    /// Observes the latest value of `T`, seeding it with `initial` if absent.
    ///
    /// # Errors
    /// Returns [`SignalError::ChannelKindMismatch`] if `T` is a broadcast notification.
    pub fn observe_latest<T: Signal>(
        &self,
        initial: T,
    ) -> Result<watch::Receiver<Arc<T>>, SignalError> {
        Ok(self.latest_sender::<T>(|| Arc::new(initial))?.subscribe())
    }

    /// Replaces the latest value of `T`.
    ///
    /// # Errors
    /// Returns [`SignalError::ChannelKindMismatch`] if `T` is a broadcast notification.
    pub fn post_latest<T: Signal>(&self, value: T) -> Result<(), SignalError> {
        let value = Arc::new(value);
        let sender = self.latest_sender::<T>(|| Arc::clone(&value))?;
        sender.send_replace(value);
        Ok(())
    }

    /// The latest value of `T`, if one was ever posted.
    #[must_use]
    pub fn latest<T: Signal>(&self) -> Option<Arc<T>> {
        let channels = self.channels.read();
        let channel = channels.get(&TypeId::of::<T>())?;
        let sender = channel.sender.downcast_ref::<watch::Sender<Arc<T>>>()?;
        Some(Arc::clone(&sender.borrow()))
    }

    /// Drops every channel, closing all observers. Returns how many were closed.
    pub fn close(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn broadcast_sender<T: Signal>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, SignalError> {
        let id = TypeId::of::<T>();

        if let Some(channel) = self.channels.read().get(&id) {
            return match channel.kind {
                ChannelKind::Broadcast { capacity: existing } => {
                    if existing != capacity && capacity != DEFAULT_CAPACITY {
                        warn!(
                            notification = type_name::<T>(),
                            existing_capacity = existing,
                            requested_capacity = capacity,
                            "Notification channel already initialized with a different capacity"
                        );
                    }
                    downcast_sender::<broadcast::Sender<Arc<T>>, T>(channel)
                },
                ChannelKind::Latest => Err(kind_mismatch::<T>(ChannelKind::Broadcast { capacity }, channel.kind)),
            };
        }

        let mut channels = self.channels.write();
        let channel = channels.entry(id).or_insert_with(|| {
            trace!(notification = type_name::<T>(), capacity, "Initializing broadcast notification channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Channel { kind: ChannelKind::Broadcast { capacity }, sender: Box::new(tx) }
        });

        match channel.kind {
            ChannelKind::Broadcast { .. } => downcast_sender::<broadcast::Sender<Arc<T>>, T>(channel),
            ChannelKind::Latest => Err(kind_mismatch::<T>(ChannelKind::Broadcast { capacity }, channel.kind)),
        }
    }

    fn latest_sender<T: Signal>(
        &self,
        initial: impl FnOnce() -> Arc<T>,
    ) -> Result<watch::Sender<Arc<T>>, SignalError> {
        let id = TypeId::of::<T>();

        if let Some(channel) = self.channels.read().get(&id) {
            return match channel.kind {
                ChannelKind::Latest => downcast_sender::<watch::Sender<Arc<T>>, T>(channel),
                ChannelKind::Broadcast { .. } => Err(kind_mismatch::<T>(ChannelKind::Latest, channel.kind)),
            };
        }

        let mut channels = self.channels.write();
        let channel = channels.entry(id).or_insert_with(|| {
            trace!(notification = type_name::<T>(), "Initializing latest-value notification channel");
            let (tx, _) = watch::channel::<Arc<T>>(initial());
            Channel { kind: ChannelKind::Latest, sender: Box::new(tx) }
        });

        match channel.kind {
            ChannelKind::Latest => downcast_sender::<watch::Sender<Arc<T>>, T>(channel),
            ChannelKind::Broadcast { .. } => Err(kind_mismatch::<T>(ChannelKind::Latest, channel.kind)),
        }
    }
}

fn downcast_sender<S: Clone + 'static, T>(channel: &Channel) -> Result<S, SignalError> {
    channel.sender.downcast_ref::<S>().cloned().ok_or_else(|| SignalError::TypeMismatch {
        message: type_name::<T>().into(),
        context: Some("Unexpected notification type".into()),
    })
}

fn kind_mismatch<T>(requested: ChannelKind, found: ChannelKind) -> SignalError {
    SignalError::ChannelKindMismatch {
        message: format!("Expected {requested:?} but found {found:?} for {}", type_name::<T>()).into(),
        context: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Purchased(u32);

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct CartSize(usize);

    #[test]
    fn post_without_observers_returns_zero() {
        let center = NotificationCenter::new();
        assert_eq!(center.post(Purchased(1)).unwrap(), 0);
    }

    #[test]
    fn kinds_cannot_be_mixed_for_one_type() {
        let center = NotificationCenter::new();
        center.post_latest(CartSize(1)).unwrap();

        let err = center.observe::<CartSize>().unwrap_err();
        assert!(matches!(err, SignalError::ChannelKindMismatch { .. }));

        center.post(Purchased(1)).unwrap();
        let err = center.post_latest(Purchased(2)).unwrap_err();
        assert!(matches!(err, SignalError::ChannelKindMismatch { .. }));
    }

    #[test]
    fn latest_tracks_last_posted_value() {
        let center = NotificationCenter::new();
        assert!(center.latest::<CartSize>().is_none());

        center.post_latest(CartSize(1)).unwrap();
        center.post_latest(CartSize(3)).unwrap();

        assert_eq!(center.latest::<CartSize>().as_deref(), Some(&CartSize(3)));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let center = NotificationCenter::new();
        let err = center.observe_with_capacity::<Purchased>(0).unwrap_err();
        assert!(matches!(err, SignalError::InvalidCapacity { .. }));
    }

    #[test]
    fn close_drops_every_channel() {
        let center = NotificationCenter::new();
        let _rx = center.observe::<Purchased>().unwrap();
        center.post_latest(CartSize(0)).unwrap();
        assert_eq!(center.close(), 2);
        assert_eq!(center.close(), 0);
    }
}
