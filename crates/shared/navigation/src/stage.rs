use crate::error::NavigationError;
use crate::surface::{PresentationSurface, Screen, SurfaceHost, SurfaceId, SurfaceRef};
use crate::view_model::ViewModel;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

/// One change to the stage's stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Present { parent: SurfaceId, surface: SurfaceId, title: String, animated: bool },
    /// `removed` counts the dismissed surface plus everything that was above it.
    Dismiss { surface: SurfaceId, title: String, animated: bool, removed: usize },
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present { title, animated, .. } => write!(f, "present '{title}' (animated: {animated})"),
            Self::Dismiss { title, animated, removed, .. } => {
                write!(f, "dismiss '{title}' (animated: {animated}, removed: {removed})")
            },
        }
    }
}

#[derive(Default)]
struct StageState {
    stack: Vec<Arc<dyn PresentationSurface>>,
    transitions: Vec<Transition>,
}

struct StageInner {
    root: Arc<StageRoot>,
    state: Mutex<StageState>,
    this: Weak<StageInner>,
}

/// The bottom of a stage; features are presented on top of it.
struct StageRoot {
    id: SurfaceId,
    title: String,
    stage: Weak<StageInner>,
}

/// Headless, in-memory view hierarchy.
///
/// The stage strongly owns every presented surface as a stack above its root,
/// and records each [`Transition`]. Dismissing a surface releases it together
/// with everything presented above it.
#[derive(Clone)]
pub struct Stage {
    inner: Arc<StageInner>,
}

impl Stage {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let inner = Arc::new_cyclic(|this: &Weak<StageInner>| StageInner {
            root: Arc::new(StageRoot { id: SurfaceId::next(), title, stage: this.clone() }),
            state: Mutex::default(),
            this: this.clone(),
        });
        Self { inner }
    }

    /// The router for root features.
    #[must_use]
    pub fn root(&self) -> SurfaceRef {
        let root: Arc<dyn PresentationSurface> = self.inner.root.clone();
        SurfaceRef::new(&root)
    }

    /// The topmost presented surface, `None` when only the root is showing.
    #[must_use]
    pub fn top(&self) -> Option<Arc<dyn PresentationSurface>> {
        self.inner.state.lock().stack.last().cloned()
    }

    /// Title of the topmost surface, the root's title when nothing is presented.
    #[must_use]
    pub fn top_title(&self) -> String {
        self.top().map_or_else(|| self.inner.root.title.clone(), |top| top.title().to_owned())
    }

    /// The topmost surface if it is a [`Screen`] showing a `V`.
    #[must_use]
    pub fn top_screen<V: ViewModel>(&self) -> Option<Arc<Screen<V>>> {
        self.top()?.into_any().downcast::<Screen<V>>().ok()
    }

    /// Number of presented surfaces above the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.state.lock().stack.len()
    }

    /// Titles from the root upwards.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        let state = self.inner.state.lock();
        std::iter::once(self.inner.root.title.clone())
            .chain(state.stack.iter().map(|s| s.title().to_owned()))
            .collect()
    }

    #[must_use]
    pub fn transitions(&self) -> Vec<Transition> {
        self.inner.state.lock().transitions.clone()
    }

    /// Dismisses everything above the root. Returns how many surfaces were released.
    pub fn clear(&self) -> usize {
        let bottom = self.inner.state.lock().stack.first().map(|s| s.surface_id());
        bottom.map_or(0, |id| {
            let before = self.depth();
            if let Err(error) = self.inner.remove(id, false) {
                debug!(surface = %id, %error, "Stage clear skipped");
            }
            before.saturating_sub(self.depth())
        })
    }
}

impl SurfaceHost for StageInner {
    fn push(
        &self,
        above: SurfaceId,
        surface: Arc<dyn PresentationSurface>,
        animated: bool,
    ) -> Result<(), NavigationError> {
        let id = surface.surface_id();
        let title = surface.title().to_owned();

        {
            let mut state = self.state.lock();
            let hosted = |id: SurfaceId| id == self.root.id || state.stack.iter().any(|s| s.surface_id() == id);

            if !hosted(above) {
                return Err(NavigationError::Internal {
                    message: format!("{above} is not on the stage").into(),
                    context: Some(title.into()),
                });
            }
            if hosted(id) {
                return Err(NavigationError::Internal {
                    message: format!("{id} is already presented").into(),
                    context: Some(title.into()),
                });
            }

            let host: Weak<dyn SurfaceHost> = self.this.clone();
            surface.attach(host);
            state.stack.push(surface);
            state.transitions.push(Transition::Present { parent: above, surface: id, title: title.clone(), animated });
        }

        debug!(surface = %id, parent = %above, title, animated, "Surface presented");
        Ok(())
    }

    fn remove(&self, surface: SurfaceId, animated: bool) -> Result<(), NavigationError> {
        let released = {
            let mut state = self.state.lock();
            let Some(index) = state.stack.iter().position(|s| s.surface_id() == surface) else {
                return Err(NavigationError::Internal {
                    message: format!("{surface} is not on the stage").into(),
                    context: None,
                });
            };

            let released = state.stack.split_off(index);
            let title = released.first().map(|s| s.title().to_owned()).unwrap_or_default();
            state.transitions.push(Transition::Dismiss { surface, title, animated, removed: released.len() });
            released
        };

        debug!(surface = %surface, removed = released.len(), animated, "Surface dismissed");
        // Surfaces drop outside the lock; their view-models may own outlets.
        drop(released);
        Ok(())
    }
}

impl PresentationSurface for StageRoot {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn present(&self, child: Arc<dyn PresentationSurface>, animated: bool) -> Result<(), NavigationError> {
        let stage = self.stage.upgrade().ok_or_else(|| NavigationError::SurfaceReleased {
            message: "stage is gone".into(),
            context: Some(self.title.clone().into()),
        })?;
        stage.push(self.id, child, animated)
    }

    fn dismiss(&self, _animated: bool) -> Result<(), NavigationError> {
        Err(NavigationError::Internal { message: "the stage root cannot be dismissed".into(), context: None })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl fmt::Debug for StageRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRoot").field("id", &self.id).field("title", &self.title).finish()
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage").field("titles", &self.titles()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Blank;

    impl ViewModel for Blank {
        type Inputs = ();
        type Outputs = ();

        fn inputs(&self) -> &() {
            &()
        }

        fn outputs(&self) -> &() {
            &()
        }
    }

    fn screen(title: &'static str) -> Arc<dyn PresentationSurface> {
        Screen::new(title, Blank).into_surface()
    }

    #[test]
    fn present_and_dismiss_follow_the_stack() {
        let stage = Stage::new("root");
        let list = screen("list");
        let detail = screen("detail");

        stage.root().present(list.clone(), true).unwrap();
        list.present(detail.clone(), false).unwrap();
        assert_eq!(stage.titles(), ["root", "list", "detail"]);
        assert_eq!(stage.top_title(), "detail");

        list.dismiss(true).unwrap();
        assert_eq!(stage.depth(), 0);
        assert!(matches!(
            stage.transitions().last(),
            Some(Transition::Dismiss { removed: 2, .. })
        ));
    }

    #[test]
    fn dismissed_surfaces_are_released() {
        let stage = Stage::new("root");
        let list = screen("list");
        let handle = SurfaceRef::new(&list);

        stage.root().present(list, true).unwrap();
        assert!(handle.is_alive());

        handle.dismiss(true).unwrap();
        assert!(!handle.is_alive());
        assert!(matches!(handle.dismiss(true), Err(NavigationError::SurfaceReleased { .. })));
    }

    #[test]
    fn a_surface_cannot_be_presented_twice() {
        let stage = Stage::new("root");
        let list = screen("list");
        stage.root().present(list.clone(), true).unwrap();
        assert!(stage.root().present(list, true).is_err());
        assert_eq!(stage.depth(), 1);
    }

    #[test]
    fn unpresented_screens_cannot_route() {
        let orphan = screen("orphan");
        assert!(matches!(orphan.present(screen("child"), true), Err(NavigationError::Internal { .. })));
        assert!(orphan.dismiss(true).is_err());
    }

    #[test]
    fn clear_releases_every_surface_above_the_root() {
        let stage = Stage::new("root");
        assert_eq!(stage.clear(), 0);
        assert!(stage.transitions().is_empty());

        let list = screen("list");
        let handle = SurfaceRef::new(&list);
        stage.root().present(list.clone(), true).unwrap();
        list.present(screen("detail"), true).unwrap();
        drop(list);

        assert_eq!(stage.clear(), 2);
        assert_eq!(stage.titles(), ["root"]);
        assert!(!handle.is_alive());
        assert!(matches!(
            stage.transitions().last(),
            Some(Transition::Dismiss { animated: false, removed: 2, .. })
        ));
        assert_eq!(stage.clear(), 0);
    }

    #[test]
    fn top_screen_downcasts_by_view_model() {
        let stage = Stage::new("root");
        stage.root().present(screen("list"), true).unwrap();
        assert!(stage.top_screen::<Blank>().is_some());
        assert_eq!(stage.clear(), 1);
        assert!(stage.top_screen::<Blank>().is_none());
    }
}
