use crate::state::{CoordinatorState, transition};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct ScopeInner {
    token: CancellationToken,
    state: Option<Arc<watch::Sender<CoordinatorState>>>,
    children: Mutex<Vec<Weak<ScopeInner>>>,
}

/// A structured cancellation scope.
///
/// Every started coordinator runs in its own scope, a child of the scope it
/// was started in. Cancelling a scope synchronously marks its coordinator and
/// every descendant coordinator `Cancelled`, then wakes their hosts.
#[derive(Clone, Default)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope, cancelled together with `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        self.attach(None)
    }

    pub fn cancel(&self) {
        cancel(&self.inner);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        self.inner.token.cancelled().await;
    }

    pub(crate) fn for_coordinator(
        parent: Option<&Self>,
        state: Arc<watch::Sender<CoordinatorState>>,
    ) -> Self {
        parent.map_or_else(
            || Self {
                inner: Arc::new(ScopeInner { state: Some(state.clone()), ..ScopeInner::default() }),
            },
            |parent| parent.attach(Some(state.clone())),
        )
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.inner.token.clone()
    }

    pub(crate) fn activate(&self) -> bool {
        self.inner
            .state
            .as_ref()
            .is_some_and(|s| transition(s, &[CoordinatorState::Idle], CoordinatorState::Active))
    }

    pub(crate) fn complete(&self) -> bool {
        self.inner
            .state
            .as_ref()
            .is_some_and(|s| transition(s, &[CoordinatorState::Active], CoordinatorState::Completed))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.inner.state.as_ref().is_some_and(|s| *s.borrow() == CoordinatorState::Active)
    }

    fn attach(&self, state: Option<Arc<watch::Sender<CoordinatorState>>>) -> Self {
        let child = Arc::new(ScopeInner {
            token: self.inner.token.child_token(),
            state,
            children: Mutex::default(),
        });

        {
            let mut children = self.inner.children.lock();
            children.retain(|c| c.strong_count() > 0);
            children.push(Arc::downgrade(&child));
        }

        if self.inner.token.is_cancelled() {
            cancel(&child);
        }

        Self { inner: child }
    }
}

fn cancel(inner: &ScopeInner) {
    if let Some(state) = &inner.state {
        transition(
            state,
            &[CoordinatorState::Idle, CoordinatorState::Active],
            CoordinatorState::Cancelled,
        );
    }

    let children: Vec<_> = inner.children.lock().drain(..).collect();
    for child in children.iter().filter_map(Weak::upgrade) {
        cancel(&child);
    }

    inner.token.cancel();
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("cancelled", &self.inner.token.is_cancelled())
            .field("state", &self.inner.state.as_ref().map(|s| *s.borrow()))
            .finish_non_exhaustive()
    }
}
