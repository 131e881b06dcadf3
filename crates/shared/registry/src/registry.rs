use crate::DEFAULT_MAX_DEPTH;
use crate::error::RegistryError;
use fxhash::FxHashMap;
use parking_lot::{Mutex, RwLock};
use std::any::{Any, TypeId, type_name};
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

type Factory<T> = Arc<dyn Fn(&Registry) -> Option<T> + Send + Sync>;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// How a registration produces values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// The factory runs on every resolve.
    Transient,
    /// The first produced value is cached and cloned on later resolves.
    Shared,
    /// A pre-built value is cloned on every resolve.
    Instance,
}

struct Provider<T> {
    factory: Factory<T>,
    memo: Option<Arc<Mutex<Option<T>>>>,
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self { factory: Arc::clone(&self.factory), memo: self.memo.clone() }
    }
}

struct Entry {
    discipline: Discipline,
    type_name: &'static str,
    provider: Box<dyn Any + Send + Sync>,
}

struct Inner {
    entries: RwLock<FxHashMap<TypeId, Entry>>,
    parent: Option<Registry>,
    level: usize,
    max_depth: usize,
}

/// Type-keyed factory store.
///
/// `Registry` is a cheap clonable handle; clones share the same entries. A
/// process-wide registry is created once at startup, and each build creates a
/// short-lived [`Registry::scope`] that falls back to it.
#[derive(Clone)]
pub struct Registry {
    inner: Arc<Inner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a root registry with a custom nested-resolution limit (at least 1).
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(FxHashMap::default()),
                parent: None,
                level: 0,
                max_depth: max_depth.max(1),
            }),
        }
    }

    /// Creates an empty child registry that falls back to `self` on a miss.
    ///
    /// Registrations in the child shadow the parent's and never leak into it.
    #[must_use]
    pub fn scope(&self) -> Self {
        let level = self.inner.level + 1;
        trace!(level, "Registry scope created");
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(FxHashMap::default()),
                parent: Some(self.clone()),
                level,
                max_depth: self.inner.max_depth,
            }),
        }
    }

    /// Registers a transient factory for `T`, replacing any previous registration.
    ///
    /// The factory runs on every resolve and receives this registry, so it can
    /// resolve its own dependencies.
    pub fn register<T, F>(&self, factory: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Self) -> Option<T> + Send + Sync + 'static,
    {
        self.insert(Discipline::Transient, Provider::<T> { factory: Arc::new(factory), memo: None });
    }

    /// Registers a memoised factory for `T`: the first produced value is cached
    /// for the lifetime of this registration.
    ///
    /// A factory that declines (returns `None`) is not cached and will run
    /// again on the next resolve.
    pub fn register_shared<T, F>(&self, factory: F)
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&Self) -> Option<T> + Send + Sync + 'static,
    {
        self.insert(
            Discipline::Shared,
            Provider::<T> { factory: Arc::new(factory), memo: Some(Arc::new(Mutex::new(None))) },
        );
    }

    /// Registers a pre-built value for `T`; every resolve returns a clone.
    pub fn register_instance<T>(&self, value: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.insert(
            Discipline::Instance,
            Provider::<T> { factory: Arc::new(move |_| Some(value.clone())), memo: None },
        );
    }

    /// Removes the registration for `T` in this registry. Returns whether one existed.
    ///
    /// Parent registrations are untouched.
    pub fn unregister<T: 'static>(&self) -> bool {
        let removed = self.inner.entries.write().remove(&TypeId::of::<T>()).is_some();
        trace!(capability = type_name::<T>(), level = self.inner.level, removed, "Capability unregistered");
        removed
    }

    /// Resolves `T`, falling back to parent registries.
    ///
    /// Returns `None` when nothing is registered, the factory declines, or
    /// nesting exceeds the configured depth.
    pub fn resolve<T>(&self) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        match self.lookup::<T>() {
            Ok(value) => Some(value),
            Err(RegistryError::DepthExceeded { message, .. }) => {
                warn!(capability = type_name::<T>(), %message, "Resolution depth exceeded");
                None
            },
            Err(_) => None,
        }
    }

    /// Resolves `T` or reports why it could not be resolved.
    ///
    /// # Errors
    /// Returns [`RegistryError::Unresolved`] if no value could be produced, or
    /// [`RegistryError::DepthExceeded`] if nesting exceeded the configured depth.
    pub fn require<T>(&self) -> Result<T, RegistryError>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.lookup::<T>().inspect_err(|err| {
            warn!(capability = type_name::<T>(), error = %err, "Required capability unavailable");
        })
    }

    /// Whether `T` is registered here or in a parent.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.inner.entries.read().contains_key(&TypeId::of::<T>())
            || self.inner.parent.as_ref().is_some_and(Self::contains::<T>)
    }

    /// The discipline of the registration that would serve `T`.
    #[must_use]
    pub fn discipline<T: 'static>(&self) -> Option<Discipline> {
        let local = self.inner.entries.read().get(&TypeId::of::<T>()).map(|e| e.discipline);
        local.or_else(|| self.inner.parent.as_ref().and_then(Self::discipline::<T>))
    }

    /// Number of registrations in this registry, excluding parents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Type names of the capabilities registered here, sorted.
    #[must_use]
    pub fn capabilities(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.inner.entries.read().values().map(|e| e.type_name).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.inner.parent.as_ref()
    }

    /// 0 for a root registry, +1 per [`Registry::scope`].
    #[must_use]
    pub fn level(&self) -> usize {
        self.inner.level
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.inner.max_depth
    }

    fn insert<T: Send + Sync + 'static>(&self, discipline: Discipline, provider: Provider<T>) {
        let entry = Entry { discipline, type_name: type_name::<T>(), provider: Box::new(provider) };
        let replaced = self.inner.entries.write().insert(TypeId::of::<T>(), entry).is_some();
        trace!(
            capability = type_name::<T>(),
            ?discipline,
            level = self.inner.level,
            replaced,
            "Capability registered"
        );
    }

    fn provider<T: 'static>(&self) -> Option<Provider<T>> {
        let entries = self.inner.entries.read();
        entries.get(&TypeId::of::<T>())?.provider.downcast_ref::<Provider<T>>().cloned()
    }

    fn lookup<T>(&self) -> Result<T, RegistryError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let Some(provider) = self.provider::<T>() else {
            return match &self.inner.parent {
                Some(parent) => parent.lookup::<T>(),
                None => Err(RegistryError::Unresolved { message: type_name::<T>().into(), context: None }),
            };
        };

        if let Some(memo) = &provider.memo
            && let Some(value) = memo.lock().as_ref()
        {
            trace!(capability = type_name::<T>(), level = self.inner.level, "Capability resolved from cache");
            return Ok(value.clone());
        }

        // Runs outside the entries lock so factories can resolve recursively.
        let produced = {
            let _guard = DepthGuard::enter(self.inner.max_depth).ok_or_else(|| {
                RegistryError::DepthExceeded {
                    message: format!("{} (limit {})", type_name::<T>(), self.inner.max_depth).into(),
                    context: None,
                }
            })?;
            (provider.factory)(self)
        };

        let Some(value) = produced else {
            trace!(capability = type_name::<T>(), level = self.inner.level, "Factory declined");
            return Err(RegistryError::Unresolved {
                message: type_name::<T>().into(),
                context: Some("factory returned nothing".into()),
            });
        };

        trace!(capability = type_name::<T>(), level = self.inner.level, "Capability resolved");

        match provider.memo {
            Some(memo) => Ok(memo.lock().get_or_insert(value).clone()),
            None => Ok(value),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("level", &self.inner.level)
            .field("capabilities", &self.capabilities())
            .field("max_depth", &self.inner.max_depth)
            .finish_non_exhaustive()
    }
}

struct DepthGuard;

impl DepthGuard {
    fn enter(max_depth: usize) -> Option<Self> {
        DEPTH.with(|depth| {
            let current = depth.get();
            if current >= max_depth {
                return None;
            }
            depth.set(current + 1);
            Some(Self)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Config(&'static str);

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Service(String);

    #[test]
    fn transient_factory_runs_per_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Registry::new();
        let counter = Arc::clone(&calls);
        registry.register(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(Config("fresh"))
        });

        registry.resolve::<Config>();
        registry.resolve::<Config>();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(registry.discipline::<Config>(), Some(Discipline::Transient));
    }

    #[test]
    fn shared_factory_is_memoised_until_reregistered() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Registry::new();
        let counter = Arc::clone(&calls);
        registry.register_shared(move |_| Some(Arc::new(counter.fetch_add(1, Ordering::SeqCst))));

        let first = registry.resolve::<Arc<usize>>().unwrap();
        let second = registry.resolve::<Arc<usize>>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let counter = Arc::clone(&calls);
        registry.register_shared(move |_| Some(Arc::new(counter.fetch_add(1, Ordering::SeqCst))));
        let third = registry.resolve::<Arc<usize>>().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn declined_shared_factory_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Registry::new();
        let counter = Arc::clone(&calls);
        registry.register_shared(move |_| (counter.fetch_add(1, Ordering::SeqCst) > 0).then_some(Config("late")));

        assert!(registry.resolve::<Config>().is_none());
        assert_eq!(registry.resolve::<Config>(), Some(Config("late")));
        assert_eq!(registry.resolve::<Config>(), Some(Config("late")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn factories_resolve_their_dependencies() {
        let registry = Registry::new();
        registry.register_instance(Config("eu"));
        registry.register(|r| r.resolve::<Config>().map(|c| Service(format!("svc-{}", c.0))));

        assert_eq!(registry.resolve::<Service>(), Some(Service("svc-eu".to_owned())));
        registry.unregister::<Config>();
        assert_eq!(registry.resolve::<Service>(), None);
    }

    #[test]
    fn cycles_are_cut_by_the_depth_guard() {
        let registry = Registry::with_max_depth(8);
        registry.register(|r| r.resolve::<Service>());

        assert_eq!(registry.resolve::<Service>(), None);
        DEPTH.with(|depth| assert_eq!(depth.get(), 0));
    }

    #[test]
    fn require_reports_depth_overrun() {
        let registry = Registry::with_max_depth(1);
        registry.register_instance(Config("root"));
        registry.register(|r| r.require::<Config>().ok().map(|c| Service(c.0.to_owned())));

        // The outer factory occupies the single allowed level.
        assert!(registry.resolve::<Service>().is_none());
        assert!(matches!(registry.require::<Config>(), Ok(Config("root"))));
    }

    #[test]
    fn debug_lists_capabilities() {
        let registry = Registry::new();
        registry.register_instance(Config("x"));
        let rendered = format!("{registry:?}");
        assert!(rendered.contains("Config"), "{rendered}");
    }
}
