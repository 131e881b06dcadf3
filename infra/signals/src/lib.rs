//! # Signals
//!
//! Event-stream primitives for the ViewModel/Coordinator contract.
//!
//! * [`Outlet`]: the single ordered channel of one view-model. Every output of
//!   the view-model is a typed *slot* on the outlet, so an observer sees events
//!   from different outputs in the order they were emitted.
//! * [`Input`]: an intent sink the presentation surface pushes into.
//! * [`Completer`] / [`Completion`]: a single-shot result, delivered zero or one times.
//! * [`NotificationCenter`]: a process-wide, type-keyed fan-out bus.
//!
//! # Example
//!
//! ```rust
//! use wf_signals::{Outlet, SignalError};
//!
//! #[derive(Debug, PartialEq)]
//! struct ItemSelected(u32);
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), SignalError> {
//! let outlet = Outlet::new(16)?;
//! let (emitter, output) = outlet.channel::<ItemSelected>();
//!
//! let mut stream = output.subscribe();
//! emitter.emit(ItemSelected(7));
//!
//! assert_eq!(*stream.recv().await.unwrap(), ItemSelected(7));
//! # Ok(())
//! # }
//! ```

mod completion;
mod error;
mod input;
mod notification;
mod outlet;
mod receiver;

pub use completion::{Completer, Completion, completion};
pub use error::{SignalError, SignalErrorExt};
pub use input::Input;
pub use notification::{ChannelKind, NotificationCenter};
pub use outlet::{
    DEFAULT_OUTLET_CAPACITY, Emitter, Envelope, Outlet, OutletId, OutletReceiver, Output,
    OutputStream, SlotId,
};
pub use receiver::EventReceiverExt;

use std::any::Any;

/// Marker trait for values that travel through signal channels.
///
/// Any type that is `Send + Sync + 'static` implements it.
pub trait Signal: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Signal for T {}
