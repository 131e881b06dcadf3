use std::fmt;
use tokio::sync::watch;

/// Lifecycle of a coordinator.
///
/// `Idle -> Active -> Completed` on the happy path; any live state may move
/// to `Cancelled`. Terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorState {
    /// Built, not started.
    Idle,
    /// Started: surface presented, outputs observed.
    Active,
    /// Result delivered, subscriptions released.
    Completed,
    /// Torn down before completing; no result was delivered.
    Cancelled,
}

impl CoordinatorState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    #[must_use]
    pub const fn is_live(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Atomically moves `state` from one of `from` to `to`. Returns whether it moved.
pub(crate) fn transition(
    state: &watch::Sender<CoordinatorState>,
    from: &[CoordinatorState],
    to: CoordinatorState,
) -> bool {
    state.send_if_modified(|current| {
        if from.contains(current) {
            *current = to;
            true
        } else {
            false
        }
    })
}
