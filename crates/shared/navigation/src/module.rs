use crate::coordinator::{Bindings, Coordinator, Hosted, Navigator, host};
use crate::error::NavigationError;
use crate::scope::Scope;
use crate::state::CoordinatorState;
use parking_lot::Mutex;
use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{Instrument, debug, error, info_span, warn};
use wf_signals::completion;

static NEXT_MODULE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a module and the coordinator it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u64);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module-{}", self.0)
    }
}

struct LaunchContext {
    id: ModuleId,
    name: Cow<'static, str>,
    state: Arc<watch::Sender<CoordinatorState>>,
    animated: bool,
}

trait Launch<R>: Send {
    fn launch(self: Box<Self>, ctx: LaunchContext, parent: Option<&Scope>) -> Option<Running<R>>;
}

struct Launcher<C: Coordinator> {
    coordinator: C,
    bindings: Bindings<C>,
}

impl<C: Coordinator> Launch<C::Output> for Launcher<C> {
    fn launch(self: Box<Self>, ctx: LaunchContext, parent: Option<&Scope>) -> Option<Running<C::Output>> {
        let Self { mut coordinator, bindings } = *self;
        let LaunchContext { id, name, state, animated } = ctx;

        let span = info_span!("coordinator", name = %name, id = %id);
        let scope = Scope::for_coordinator(parent, Arc::clone(&state));

        // Subscribe before `start` so nothing emitted while presenting is lost.
        let events = bindings.subscribe();

        if !scope.activate() {
            span.in_scope(|| debug!("Coordinator not started: parent scope already cancelled"));
            return None;
        }

        let (mailbox_tx, mailbox) = mpsc::unbounded_channel();
        let mut nav = Navigator::new(id, name.clone(), scope.clone(), animated, mailbox_tx);

        if let Err(err) = span.in_scope(|| coordinator.start(&mut nav)) {
            span.in_scope(|| warn!(error = %err, "Coordinator failed to start"));
            scope.cancel();
            return None;
        }
        span.in_scope(|| debug!(state = %CoordinatorState::Active, reactions = bindings.len(), "Coordinator started"));

        let (completer, completion) = completion();
        tokio::spawn(host(Hosted { coordinator, nav, bindings, events, mailbox, completer }).instrument(span));

        Some(Running { id, name, scope, state: state.subscribe(), completion: Some(completion) })
    }
}

struct ModuleInner<R> {
    id: ModuleId,
    name: Cow<'static, str>,
    state: Arc<watch::Sender<CoordinatorState>>,
    animated: AtomicBool,
    launcher: Mutex<Option<Box<dyn Launch<R>>>>,
}

/// An opaque, fully wired coordinator whose eventual result is `R`.
///
/// The wrapped coordinator's type is erased: a caller can start the module
/// and observe its state and result, nothing else. Clones share the same
/// coordinator, which starts at most once.
pub struct Module<R> {
    inner: Arc<ModuleInner<R>>,
}

impl<R: Send + 'static> Module<R> {
    /// Wraps `coordinator`, with its outputs already wired by `bindings`.
    pub fn new<C>(name: impl Into<Cow<'static, str>>, coordinator: C, bindings: Bindings<C>) -> Self
    where
        C: Coordinator<Output = R>,
    {
        let (state, _) = watch::channel(CoordinatorState::Idle);
        Self {
            inner: Arc::new(ModuleInner {
                id: ModuleId(NEXT_MODULE.fetch_add(1, Ordering::Relaxed)),
                name: name.into(),
                state: Arc::new(state),
                animated: AtomicBool::new(true),
                launcher: Mutex::new(Some(Box::new(Launcher { coordinator, bindings }))),
            }),
        }
    }

    /// Sets the animation flag the coordinator's navigator reports.
    #[must_use]
    pub fn with_animation(self, animated: bool) -> Self {
        self.inner.animated.store(animated, Ordering::Relaxed);
        self
    }

    /// Starts the coordinator as a root: nothing but its [`Running`] handle cancels it.
    ///
    /// Returns `None` (logged) when already started, outside a tokio runtime,
    /// or when the coordinator fails to start.
    #[must_use = "dropping the running handle cancels the coordinator"]
    pub fn start(&self) -> Option<Running<R>> {
        self.start_with(None)
    }

    /// Starts the coordinator inside `parent`; cancelling `parent` cancels it.
    #[must_use = "dropping the running handle cancels the coordinator"]
    pub fn start_in(&self, parent: &Scope) -> Option<Running<R>> {
        self.start_with(Some(parent))
    }

    /// Like [`Module::start`], reporting why nothing started.
    ///
    /// # Errors
    /// Returns [`NavigationError::AlreadyStarted`] on a second start, or
    /// [`NavigationError::Internal`] outside a tokio runtime or when the
    /// coordinator fails to start.
    pub fn try_start(&self, parent: Option<&Scope>) -> Result<Running<R>, NavigationError> {
        if Handle::try_current().is_err() {
            return Err(NavigationError::Internal {
                message: "coordinators must start inside a tokio runtime".into(),
                context: Some(self.inner.name.clone()),
            });
        }

        let launcher = self.inner.launcher.lock().take().ok_or_else(|| NavigationError::AlreadyStarted {
            message: self.inner.id.to_string().into(),
            context: Some(self.inner.name.clone()),
        })?;

        let ctx = LaunchContext {
            id: self.inner.id,
            name: self.inner.name.clone(),
            state: Arc::clone(&self.inner.state),
            animated: self.inner.animated.load(Ordering::Relaxed),
        };

        launcher.launch(ctx, parent).ok_or_else(|| NavigationError::Internal {
            message: "coordinator did not start".into(),
            context: Some(self.inner.name.clone()),
        })
    }

    fn start_with(&self, parent: Option<&Scope>) -> Option<Running<R>> {
        match self.try_start(parent) {
            Ok(running) => Some(running),
            Err(err @ NavigationError::AlreadyStarted { .. }) => {
                warn!(module = %self.inner.id, name = %self.inner.name, error = %err, "Second start ignored");
                None
            },
            Err(err) if self.inner.launcher.lock().is_some() => {
                error!(module = %self.inner.id, name = %self.inner.name, error = %err, "Module not started");
                None
            },
            Err(err) => {
                debug!(module = %self.inner.id, name = %self.inner.name, error = %err, "Module not started");
                None
            },
        }
    }
}

impl<R> Module<R> {
    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.inner.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        *self.inner.state.borrow()
    }

    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<CoordinatorState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.inner.launcher.lock().is_none()
    }
}

impl<R> Clone for Module<R> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<R> fmt::Debug for Module<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("result", &type_name::<R>())
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

/// A started coordinator.
///
/// Dropping the handle before the result arrives cancels the coordinator and
/// its children.
pub struct Running<R> {
    id: ModuleId,
    name: Cow<'static, str>,
    scope: Scope,
    state: watch::Receiver<CoordinatorState>,
    completion: Option<wf_signals::Completion<R>>,
}

impl<R> Running<R> {
    /// Waits for the result; `None` if the coordinator was cancelled.
    pub async fn outcome(mut self) -> Option<R> {
        let completion = self.completion.take()?;
        completion.wait().await
    }

    /// Cancels the coordinator and its children; no result will be delivered.
    pub fn cancel(&self) {
        self.scope.cancel();
    }

    #[must_use]
    pub const fn id(&self) -> ModuleId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn state(&self) -> CoordinatorState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<CoordinatorState> {
        self.state.clone()
    }

    /// Waits until the coordinator reaches `target`.
    ///
    /// Returns `false` if it settled in a different terminal state instead.
    pub async fn wait_for(&self, target: CoordinatorState) -> bool {
        let mut state = self.state.clone();
        state
            .wait_for(|current| *current == target || current.is_terminal())
            .await
            .is_ok_and(|reached| *reached == target)
    }

    pub(crate) const fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl<R> Drop for Running<R> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

impl<R> fmt::Debug for Running<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Running")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
