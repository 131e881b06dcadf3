use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// An intent sink fed by the presentation surface.
///
/// Sending is synchronous: the view-model's handler runs on the caller's
/// context before `send` returns.
pub struct Input<T> {
    handler: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> Input<T> {
    pub fn new(handler: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self { handler: Arc::new(handler) }
    }

    pub fn send(&self, value: T) {
        (self.handler)(value);
    }
}

impl Input<()> {
    /// Shorthand for `send(())` on unit intents such as "close" or "confirm".
    pub fn trigger(&self) {
        self.send(());
    }
}

impl<T> Clone for Input<T> {
    fn clone(&self) -> Self {
        Self { handler: Arc::clone(&self.handler) }
    }
}

impl<T> fmt::Debug for Input<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input").field("intent", &type_name::<T>()).finish_non_exhaustive()
    }
}
