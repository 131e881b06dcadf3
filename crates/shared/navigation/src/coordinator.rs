use crate::error::NavigationError;
use crate::module::{Module, ModuleId};
use crate::scope::Scope;
use crate::state::CoordinatorState;
use fxhash::FxHashMap;
use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};
use wf_signals::{Completer, Envelope, Outlet, OutletReceiver, Output, Signal, SlotId};

/// A hierarchical navigation state machine for one feature.
///
/// A coordinator is created by a builder, wrapped in a [`Module`] and run by a
/// host task once started. Reactions to view-model outputs and to child
/// results run on that task one at a time, in the order they arrive.
pub trait Coordinator: Sized + Send + 'static {
    /// The single result delivered on completion.
    type Output: Send + 'static;

    /// Presents the feature. Called once, in the `Active` state, before any reaction.
    ///
    /// # Errors
    /// A failed start cancels the coordinator; no result is delivered.
    fn start(&mut self, nav: &mut Navigator<Self>) -> Result<(), NavigationError>;

    /// Called once when the coordinator is torn down without completing.
    fn on_cancel(&mut self) {}
}

/// A reaction to one output, as bound by a builder.
pub type Reaction<C, T> = fn(&mut C, Arc<T>, &mut Navigator<C>);

/// A reaction to a child's result.
pub type ChildReaction<C, R> = fn(&mut C, R, &mut Navigator<C>);

type ErasedReaction<C> = Box<dyn Fn(&mut C, Envelope, &mut Navigator<C>) + Send + Sync>;
type Delivery<C> = Box<dyn FnOnce(&mut C, &mut Navigator<C>) + Send>;

/// View-model outputs wired to coordinator reactions.
///
/// Every bound output must come from the same view-model outlet, so the host
/// observes all of them through one ordered subscription.
pub struct Bindings<C: Coordinator> {
    outlet: Option<Outlet>,
    reactions: FxHashMap<SlotId, ErasedReaction<C>>,
}

impl<C: Coordinator> Bindings<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { outlet: None, reactions: FxHashMap::default() }
    }

    /// Wires `output` to `reaction`, replacing any reaction already bound to it.
    ///
    /// # Errors
    /// Returns [`NavigationError::ForeignOutput`] if `output` belongs to a
    /// different outlet than the outputs bound before it.
    pub fn bind<T: Signal>(mut self, output: &Output<T>, reaction: Reaction<C, T>) -> Result<Self, NavigationError> {
        match &self.outlet {
            Some(outlet) if outlet.id() != output.outlet_id() => {
                return Err(NavigationError::ForeignOutput {
                    message: format!("expected {} but got {}", outlet.id(), output.outlet_id()).into(),
                    context: Some(type_name::<T>().into()),
                });
            },
            Some(_) => {},
            None => self.outlet = Some(output.outlet().clone()),
        }

        self.reactions.insert(
            output.slot(),
            Box::new(move |coordinator, envelope, nav| {
                if let Some(value) = envelope.downcast::<T>() {
                    reaction(coordinator, value, nav);
                }
            }),
        );
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub(crate) fn subscribe(&self) -> Option<OutletReceiver> {
        self.outlet.as_ref().map(Outlet::subscribe_all)
    }

    fn dispatch(&self, coordinator: &mut C, envelope: Envelope, nav: &mut Navigator<C>) {
        if !nav.is_reacting() {
            trace!(slot = envelope.slot().get(), "Output ignored: coordinator no longer active");
            return;
        }
        if let Some(reaction) = self.reactions.get(&envelope.slot()) {
            reaction(coordinator, envelope, nav);
        }
    }
}

impl<C: Coordinator> Default for Bindings<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Coordinator> fmt::Debug for Bindings<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("outlet", &self.outlet.as_ref().map(Outlet::id))
            .field("reactions", &self.reactions.len())
            .finish()
    }
}

/// Summary of an owned child coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSummary {
    pub id: ModuleId,
    pub name: Cow<'static, str>,
    pub state: CoordinatorState,
}

struct ChildHandle {
    name: Cow<'static, str>,
    scope: Scope,
    state: watch::Receiver<CoordinatorState>,
}

pub(crate) struct ChildEvent<C: Coordinator> {
    id: ModuleId,
    delivery: Option<Delivery<C>>,
}

/// The context a coordinator reacts in.
pub struct Navigator<C: Coordinator> {
    id: ModuleId,
    name: Cow<'static, str>,
    scope: Scope,
    animated: bool,
    result: Option<C::Output>,
    children: FxHashMap<ModuleId, ChildHandle>,
    mailbox: mpsc::UnboundedSender<ChildEvent<C>>,
}

impl<C: Coordinator> Navigator<C> {
    pub(crate) fn new(
        id: ModuleId,
        name: Cow<'static, str>,
        scope: Scope,
        animated: bool,
        mailbox: mpsc::UnboundedSender<ChildEvent<C>>,
    ) -> Self {
        Self { id, name, scope, animated, result: None, children: FxHashMap::default(), mailbox }
    }

    #[must_use]
    pub const fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default animation flag for this coordinator's transitions.
    #[must_use]
    pub const fn animated(&self) -> bool {
        self.animated
    }

    /// Completes the coordinator with `value`.
    ///
    /// Only the first call counts; the host delivers the value once the
    /// current reaction returns, after releasing every subscription.
    pub fn complete(&mut self, value: C::Output) {
        if self.result.is_some() {
            warn!(coordinator = %self.id, "Coordinator already completed; result ignored");
            return;
        }
        debug!(coordinator = %self.id, "Coordinator completing");
        self.result = Some(value);
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.result.is_some()
    }

    /// Starts `module` as an owned child and routes its result to `on_result`.
    ///
    /// Returns `false` (and navigates nowhere) when this coordinator is
    /// completing or no longer active, or the module cannot be started. A
    /// child that ends without a result is dropped silently.
    pub fn start_child<R: Send + 'static>(&mut self, module: &Module<R>, on_result: ChildReaction<C, R>) -> bool {
        if !self.is_reacting() {
            warn!(coordinator = %self.id, child = module.name(), "Child not started: coordinator is finishing");
            return false;
        }

        let Some(running) = module.start_in(&self.scope) else {
            return false;
        };

        let id = running.id();
        self.children.insert(
            id,
            ChildHandle { name: running.name().to_owned().into(), scope: running.scope().clone(), state: running.watch_state() },
        );
        debug!(coordinator = %self.id, child = %id, name = running.name(), "Child started");

        let mailbox = self.mailbox.clone();
        tokio::spawn(async move {
            let delivery = running.outcome().await.map(|value| {
                Box::new(move |coordinator: &mut C, nav: &mut Self| on_result(coordinator, value, nav)) as Delivery<C>
            });
            // The parent may already be gone.
            let _ = mailbox.send(ChildEvent { id, delivery });
        });

        true
    }

    /// Cancels every owned child without delivering their results.
    pub fn cancel_children(&mut self) -> usize {
        let count = self.children.len();
        for (id, child) in self.children.drain() {
            debug!(child = %id, name = %child.name, "Child cancelled");
            child.scope.cancel();
        }
        count
    }

    #[must_use]
    pub fn children(&self) -> Vec<ChildSummary> {
        let mut children: Vec<_> = self
            .children
            .iter()
            .map(|(id, child)| ChildSummary { id: *id, name: child.name.clone(), state: *child.state.borrow() })
            .collect();
        children.sort_by_key(|c| c.id);
        children
    }

    fn is_reacting(&self) -> bool {
        self.result.is_none() && self.scope.is_active()
    }

    fn deliver(&mut self, coordinator: &mut C, event: ChildEvent<C>) {
        if self.children.remove(&event.id).is_none() {
            trace!(coordinator = %self.id, child = %event.id, "Result of a released child ignored");
            return;
        }
        match event.delivery {
            Some(delivery) if self.is_reacting() => delivery(coordinator, self),
            Some(_) => trace!(coordinator = %self.id, child = %event.id, "Child result ignored: coordinator finishing"),
            None => debug!(coordinator = %self.id, child = %event.id, "Child ended without a result"),
        }
    }
}

impl<C: Coordinator> fmt::Debug for Navigator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("animated", &self.animated)
            .field("completed", &self.result.is_some())
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

/// Everything the host task owns for one running coordinator.
pub(crate) struct Hosted<C: Coordinator> {
    pub(crate) coordinator: C,
    pub(crate) nav: Navigator<C>,
    pub(crate) bindings: Bindings<C>,
    pub(crate) events: Option<OutletReceiver>,
    pub(crate) mailbox: mpsc::UnboundedReceiver<ChildEvent<C>>,
    pub(crate) completer: Completer<C::Output>,
}

/// Runs reactions until the coordinator completes or its scope is cancelled,
/// then releases everything it holds on the way out.
pub(crate) async fn host<C: Coordinator>(hosted: Hosted<C>) {
    let Hosted { mut coordinator, mut nav, bindings, mut events, mut mailbox, completer } = hosted;
    let token = nav.scope.token();

    while nav.is_reacting() {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            envelope = next_envelope(&mut events) => match envelope {
                Some(envelope) => bindings.dispatch(&mut coordinator, envelope, &mut nav),
                None => events = None,
            },
            Some(event) = mailbox.recv() => nav.deliver(&mut coordinator, event),
        }
    }

    match nav.result.take() {
        Some(value) if nav.scope.complete() => {
            drop(events);
            drop(bindings);
            nav.cancel_children();
            nav.scope.cancel();
            debug!(state = %CoordinatorState::Completed, "Coordinator completed");
            completer.complete(value);
        },
        _ => {
            coordinator.on_cancel();
            drop(events);
            nav.children.clear();
            nav.scope.cancel();
            debug!(state = %CoordinatorState::Cancelled, "Coordinator cancelled");
            drop(completer);
        },
    }
}

async fn next_envelope(events: &mut Option<OutletReceiver>) -> Option<Envelope> {
    match events {
        Some(receiver) => receiver.next().await,
        None => future::pending().await,
    }
}
