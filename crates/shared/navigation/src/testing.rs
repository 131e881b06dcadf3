//! Test doubles for code that routes against presentation surfaces.

use crate::error::NavigationError;
use crate::surface::{PresentationSurface, SurfaceHost, SurfaceId, SurfaceRef};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// A call observed by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Present { surface: SurfaceId, title: String, animated: bool },
    Dismiss { surface: SurfaceId, title: String, animated: bool },
}

impl SurfaceCall {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Present { title, .. } | Self::Dismiss { title, .. } => title,
        }
    }
}

/// A root surface that records every present and dismiss.
///
/// Surfaces presented on it, directly or on top of each other, are kept alive
/// until dismissed, so coordinators can route against them as they would
/// against a real hierarchy.
pub struct RecordingSurface {
    id: SurfaceId,
    title: String,
    this: Weak<Self>,
    calls: Mutex<Vec<SurfaceCall>>,
    presented: Mutex<Vec<Arc<dyn PresentationSurface>>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Arc<Self> {
        let title = title.into();
        Arc::new_cyclic(|this| Self {
            id: SurfaceId::next(),
            title,
            this: this.clone(),
            calls: Mutex::default(),
            presented: Mutex::default(),
        })
    }

    /// A router handle to this surface.
    #[must_use]
    pub fn router(self: &Arc<Self>) -> SurfaceRef {
        let surface: Arc<dyn PresentationSurface> = self.clone();
        SurfaceRef::new(&surface)
    }

    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    /// Titles of the surfaces currently presented, bottom first.
    #[must_use]
    pub fn presented(&self) -> Vec<String> {
        self.presented.lock().iter().map(|s| s.title().to_owned()).collect()
    }

    #[must_use]
    pub fn top(&self) -> Option<Arc<dyn PresentationSurface>> {
        self.presented.lock().last().cloned()
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().push(call);
    }
}

impl SurfaceHost for RecordingSurface {
    fn push(&self, _above: SurfaceId, surface: Arc<dyn PresentationSurface>, animated: bool) -> Result<(), NavigationError> {
        let host: Weak<dyn SurfaceHost> = self.this.clone();
        surface.attach(host);
        self.record(SurfaceCall::Present { surface: surface.surface_id(), title: surface.title().to_owned(), animated });
        self.presented.lock().push(surface);
        Ok(())
    }

    fn remove(&self, surface: SurfaceId, animated: bool) -> Result<(), NavigationError> {
        let released = {
            let mut presented = self.presented.lock();
            let index = presented.iter().position(|s| s.surface_id() == surface).ok_or_else(|| {
                NavigationError::Internal { message: format!("{surface} is not presented").into(), context: None }
            })?;
            presented.split_off(index)
        };
        let title = released.first().map(|s| s.title().to_owned()).unwrap_or_default();
        self.record(SurfaceCall::Dismiss { surface, title, animated });
        drop(released);
        Ok(())
    }
}

impl PresentationSurface for RecordingSurface {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn present(&self, child: Arc<dyn PresentationSurface>, animated: bool) -> Result<(), NavigationError> {
        self.push(self.id, child, animated)
    }

    fn dismiss(&self, animated: bool) -> Result<(), NavigationError> {
        self.record(SurfaceCall::Dismiss { surface: self.id, title: self.title.clone(), animated });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl fmt::Debug for RecordingSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSurface")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("calls", &self.calls.lock().len())
            .finish_non_exhaustive()
    }
}
