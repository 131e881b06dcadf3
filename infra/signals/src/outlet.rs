use crate::Signal;
use crate::error::SignalError;
use std::any::{Any, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{trace, warn};

/// Default backlog threshold of an outlet; matches `navigation.output_capacity`.
pub const DEFAULT_OUTLET_CAPACITY: usize = 64;

static NEXT_OUTLET: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Outlet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutletId(u64);

impl fmt::Display for OutletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "outlet-{}", self.0)
    }
}

/// Identity of one typed output within its outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);

impl SlotId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// One emitted value, tagged with the slot it was emitted on.
#[derive(Clone)]
pub struct Envelope {
    slot: SlotId,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Envelope {
    #[must_use]
    pub const fn slot(&self) -> SlotId {
        self.slot
    }

    /// Returns the payload if it has type `T`.
    #[must_use]
    pub fn downcast<T: Signal>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.payload).downcast::<T>().ok()
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope").field("slot", &self.slot).finish_non_exhaustive()
    }
}

struct OutletInner {
    id: OutletId,
    capacity: usize,
    observers: Mutex<Vec<mpsc::UnboundedSender<Envelope>>>,
    next_slot: AtomicU32,
}

impl OutletInner {
    fn live_observers(&self) -> usize {
        let mut observers = self.observers.lock();
        observers.retain(|tx| !tx.is_closed());
        observers.len()
    }
}

/// The ordered event channel of a single view-model.
///
/// All outputs created with [`Outlet::channel`] fan out through the same
/// observer list under one lock, so the emission order across outputs is the
/// observation order. Every observer owns an unbounded queue: a burst emitted
/// before the observer runs is delivered in full, never overwritten.
#[derive(Clone)]
pub struct Outlet {
    inner: Arc<OutletInner>,
}

impl Outlet {
    /// Creates an outlet whose observers warn once `capacity` events are queued.
    ///
    /// # Errors
    /// Returns [`SignalError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SignalError> {
        if capacity == 0 {
            return Err(SignalError::InvalidCapacity {
                message: "outlet capacity must be >= 1".into(),
                context: None,
            });
        }

        Ok(Self::with_capacity(capacity))
    }

    fn with_capacity(capacity: usize) -> Self {
        let id = OutletId(NEXT_OUTLET.fetch_add(1, Ordering::Relaxed));
        trace!(outlet = %id, capacity, "Outlet created");

        Self {
            inner: Arc::new(OutletInner {
                id,
                capacity,
                observers: Mutex::new(Vec::new()),
                next_slot: AtomicU32::new(0),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> OutletId {
        self.inner.id
    }

    /// Allocates a new typed slot and returns its emitting and observing halves.
    #[must_use]
    pub fn channel<T: Signal>(&self) -> (Emitter<T>, Output<T>) {
        let slot = SlotId(self.inner.next_slot.fetch_add(1, Ordering::Relaxed));
        trace!(outlet = %self.inner.id, slot = slot.0, signal = type_name::<T>(), "Slot allocated");

        (
            Emitter { outlet: self.clone(), slot, _marker: PhantomData },
            Output { outlet: self.clone(), slot, _marker: PhantomData },
        )
    }

    /// Subscribes to every slot of this outlet, in emission order.
    #[must_use]
    pub fn subscribe_all(&self) -> OutletReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.observers.lock().push(tx);

        OutletReceiver { outlet: self.inner.id, capacity: self.inner.capacity, rx, backlogged: false }
    }

    /// Number of live receivers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.live_observers()
    }
}

impl Default for Outlet {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_OUTLET_CAPACITY)
    }
}

impl fmt::Debug for Outlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outlet")
            .field("id", &self.inner.id)
            .field("capacity", &self.inner.capacity)
            .field("observers", &self.inner.live_observers())
            .finish()
    }
}

/// The emitting half of an output; owned by the view-model.
pub struct Emitter<T> {
    outlet: Outlet,
    slot: SlotId,
    _marker: PhantomData<fn(T)>,
}

impl<T: Signal> Emitter<T> {
    /// Emits `value` to every current observer of the outlet.
    ///
    /// Returns the number of observers reached; emitting with no observers is
    /// not an error, the value is simply dropped.
    pub fn emit(&self, value: T) -> usize {
        let envelope = Envelope { slot: self.slot, payload: Arc::new(value) };

        // Held across the fan-out so concurrent emitters interleave identically
        // for every observer.
        let mut observers = self.outlet.inner.observers.lock();
        observers.retain(|tx| tx.send(envelope.clone()).is_ok());
        let count = observers.len();
        drop(observers);

        if count == 0 {
            trace!(outlet = %self.outlet.inner.id, signal = type_name::<T>(), "Signal dropped: no observers");
        } else {
            trace!(outlet = %self.outlet.inner.id, signal = type_name::<T>(), count, "Signal emitted");
        }
        count
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self { outlet: self.outlet.clone(), slot: self.slot, _marker: PhantomData }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("outlet", &self.outlet.inner.id)
            .field("slot", &self.slot)
            .field("signal", &type_name::<T>())
            .finish()
    }
}

/// The observing half of an output; exposed by the view-model.
pub struct Output<T> {
    outlet: Outlet,
    slot: SlotId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Signal> Output<T> {
    /// Subscribes to this output only; values from other slots are skipped.
    #[must_use]
    pub fn subscribe(&self) -> OutputStream<T> {
        OutputStream { receiver: self.outlet.subscribe_all(), slot: self.slot, _marker: PhantomData }
    }
}

impl<T> Output<T> {
    #[must_use]
    pub const fn slot(&self) -> SlotId {
        self.slot
    }

    #[must_use]
    pub fn outlet_id(&self) -> OutletId {
        self.outlet.inner.id
    }

    /// The outlet this output belongs to.
    #[must_use]
    pub const fn outlet(&self) -> &Outlet {
        &self.outlet
    }
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self { outlet: self.outlet.clone(), slot: self.slot, _marker: PhantomData }
    }
}

impl<T> fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("outlet", &self.outlet.inner.id)
            .field("slot", &self.slot)
            .field("signal", &type_name::<T>())
            .finish()
    }
}

/// Receives every envelope of an outlet without loss.
#[derive(Debug)]
pub struct OutletReceiver {
    outlet: OutletId,
    capacity: usize,
    rx: mpsc::UnboundedReceiver<Envelope>,
    backlogged: bool,
}

impl OutletReceiver {
    /// Waits for the next envelope; `None` once every handle to the outlet is gone.
    ///
    /// Cancel safe. A backlog reaching the outlet capacity is logged once per
    /// crossing; queued envelopes are always delivered.
    pub async fn next(&mut self) -> Option<Envelope> {
        let envelope = self.rx.recv().await?;

        let backlog = self.rx.len();
        if backlog >= self.capacity && !self.backlogged {
            warn!(outlet = %self.outlet, backlog, capacity = self.capacity, "Outlet receiver falling behind");
        }
        self.backlogged = backlog >= self.capacity;

        Some(envelope)
    }

    /// Number of envelopes queued for this receiver.
    #[must_use]
    pub fn backlog(&self) -> usize {
        self.rx.len()
    }

    #[must_use]
    pub const fn outlet(&self) -> OutletId {
        self.outlet
    }
}

/// A typed stream over one output slot.
#[derive(Debug)]
pub struct OutputStream<T> {
    receiver: OutletReceiver,
    slot: SlotId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Signal> OutputStream<T> {
    /// Waits for the next value of this output; `None` once the outlet closes.
    pub async fn recv(&mut self) -> Option<Arc<T>> {
        loop {
            let envelope = self.receiver.next().await?;
            if envelope.slot != self.slot {
                continue;
            }
            if let Some(value) = envelope.downcast::<T>() {
                return Some(value);
            }
        }
    }
}
