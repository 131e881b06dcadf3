use crate::error::NavigationError;
use crate::view_model::ViewModel;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(u64);

impl SurfaceId {
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SURFACE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Abstract transition operations a coordinator routes with.
///
/// The concrete owner of a surface is the view hierarchy (a [`Stage`] in a
/// headless host), never the coordinator; coordinators reach surfaces
/// through a [`SurfaceRef`].
///
/// [`Stage`]: crate::Stage
pub trait PresentationSurface: Any + fmt::Debug + Send + Sync {
    fn surface_id(&self) -> SurfaceId;

    fn title(&self) -> &str;

    /// Presents `child` on top of this surface.
    ///
    /// # Errors
    /// Fails when this surface is not part of a live hierarchy.
    fn present(&self, child: Arc<dyn PresentationSurface>, animated: bool) -> Result<(), NavigationError>;

    /// Removes this surface, and anything presented on top of it.
    ///
    /// # Errors
    /// Fails when this surface is not currently presented.
    fn dismiss(&self, animated: bool) -> Result<(), NavigationError>;

    /// Called by a host when it takes ownership of this surface.
    fn attach(&self, _host: Weak<dyn SurfaceHost>) {}

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// The owner of presented surfaces.
pub trait SurfaceHost: Send + Sync {
    /// Takes ownership of `surface`, presented above `above`.
    ///
    /// # Errors
    /// Fails when `above` is not hosted here.
    fn push(
        &self,
        above: SurfaceId,
        surface: Arc<dyn PresentationSurface>,
        animated: bool,
    ) -> Result<(), NavigationError>;

    /// Releases `surface` and everything above it.
    ///
    /// # Errors
    /// Fails when `surface` is not hosted here.
    fn remove(&self, surface: SurfaceId, animated: bool) -> Result<(), NavigationError>;
}

/// A non-owning handle to a presentation surface.
///
/// Every use checks liveness first; a released surface yields
/// [`NavigationError::SurfaceReleased`].
#[derive(Clone)]
pub struct SurfaceRef {
    id: SurfaceId,
    surface: Weak<dyn PresentationSurface>,
}

impl SurfaceRef {
    #[must_use]
    pub fn new(surface: &Arc<dyn PresentationSurface>) -> Self {
        Self { id: surface.surface_id(), surface: Arc::downgrade(surface) }
    }

    #[must_use]
    pub const fn id(&self) -> SurfaceId {
        self.id
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.surface.strong_count() > 0
    }

    #[must_use]
    pub fn upgrade(&self) -> Option<Arc<dyn PresentationSurface>> {
        self.surface.upgrade()
    }

    /// # Errors
    /// Returns [`NavigationError::SurfaceReleased`] if the surface is gone, or
    /// the surface's own presentation error.
    pub fn present(&self, child: Arc<dyn PresentationSurface>, animated: bool) -> Result<(), NavigationError> {
        self.live()?.present(child, animated)
    }

    /// # Errors
    /// Returns [`NavigationError::SurfaceReleased`] if the surface is gone, or
    /// the surface's own dismissal error.
    pub fn dismiss(&self, animated: bool) -> Result<(), NavigationError> {
        self.live()?.dismiss(animated)
    }

    fn live(&self) -> Result<Arc<dyn PresentationSurface>, NavigationError> {
        self.surface.upgrade().ok_or_else(|| NavigationError::SurfaceReleased {
            message: self.id.to_string().into(),
            context: None,
        })
    }
}

impl fmt::Debug for SurfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceRef").field("id", &self.id).field("alive", &self.is_alive()).finish()
    }
}

/// A generic surface showing one view-model.
pub struct Screen<V> {
    id: SurfaceId,
    title: Cow<'static, str>,
    view_model: V,
    host: OnceLock<Weak<dyn SurfaceHost>>,
}

impl<V: ViewModel> Screen<V> {
    #[must_use]
    pub fn new(title: impl Into<Cow<'static, str>>, view_model: V) -> Self {
        Self { id: SurfaceId::next(), title: title.into(), view_model, host: OnceLock::new() }
    }

    /// Type-erased, ready to hand to a router.
    #[must_use]
    pub fn into_surface(self) -> Arc<dyn PresentationSurface> {
        Arc::new(self)
    }

    #[must_use]
    pub const fn view_model(&self) -> &V {
        &self.view_model
    }

    fn host(&self) -> Result<Arc<dyn SurfaceHost>, NavigationError> {
        let host = self.host.get().ok_or_else(|| NavigationError::Internal {
            message: format!("{} is not presented", self.id).into(),
            context: Some(self.title.clone()),
        })?;
        host.upgrade().ok_or_else(|| NavigationError::SurfaceReleased {
            message: "surface host is gone".into(),
            context: Some(self.title.clone()),
        })
    }
}

impl<V: ViewModel> PresentationSurface for Screen<V> {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn present(&self, child: Arc<dyn PresentationSurface>, animated: bool) -> Result<(), NavigationError> {
        self.host()?.push(self.id, child, animated)
    }

    fn dismiss(&self, animated: bool) -> Result<(), NavigationError> {
        self.host()?.remove(self.id, animated)
    }

    fn attach(&self, host: Weak<dyn SurfaceHost>) {
        // A surface belongs to one host for its whole life.
        let _ = self.host.set(host);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<V: ViewModel> fmt::Debug for Screen<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("view_model", &self.view_model)
            .finish_non_exhaustive()
    }
}

/// A coordinator's routing state: the router it presents against, the
/// surface it will present, and a weak handle to it once presented.
pub struct Route {
    router: SurfaceRef,
    pending: Option<Arc<dyn PresentationSurface>>,
    presented: Option<SurfaceRef>,
}

impl Route {
    #[must_use]
    pub fn new(router: SurfaceRef, surface: Arc<dyn PresentationSurface>) -> Self {
        Self { router, pending: Some(surface), presented: None }
    }

    /// Hands the surface to the router, keeping only a weak handle.
    ///
    /// # Errors
    /// Returns [`NavigationError::Internal`] when already presented, or the
    /// router's error (typically [`NavigationError::SurfaceReleased`]).
    pub fn present(&mut self, animated: bool) -> Result<SurfaceRef, NavigationError> {
        let surface = self.pending.take().ok_or_else(|| NavigationError::Internal {
            message: "route already presented".into(),
            context: None,
        })?;
        let handle = SurfaceRef::new(&surface);
        self.router.present(surface, animated)?;
        self.presented = Some(handle.clone());
        Ok(handle)
    }

    /// # Errors
    /// Returns [`NavigationError::Internal`] when nothing was presented, or the
    /// surface's dismissal error.
    pub fn dismiss(&self, animated: bool) -> Result<(), NavigationError> {
        self.presented
            .as_ref()
            .ok_or_else(|| NavigationError::Internal { message: "route not presented".into(), context: None })?
            .dismiss(animated)
    }

    /// The presented surface; routers for child features.
    #[must_use]
    pub const fn surface(&self) -> Option<&SurfaceRef> {
        self.presented.as_ref()
    }

    #[must_use]
    pub const fn router(&self) -> &SurfaceRef {
        &self.router
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("router", &self.router)
            .field("presented", &self.presented)
            .finish_non_exhaustive()
    }
}
