use std::sync::Arc;
use std::thread;
use wf_registry::{Discipline, Registry, RegistryError};

trait Analytics: Send + Sync {
    fn name(&self) -> &'static str;
}

struct Console;
impl Analytics for Console {
    fn name(&self) -> &'static str {
        "console"
    }
}

struct Silent;
impl Analytics for Silent {
    fn name(&self) -> &'static str {
        "silent"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Key(&'static str);

#[test]
fn latest_registration_wins() {
    let registry = Registry::new();
    registry.register(|_| Some(Key("ok")));
    assert_eq!(registry.resolve::<Key>(), Some(Key("ok")));

    registry.register(|_| Some(Key("replaced")));
    assert_eq!(registry.resolve::<Key>(), Some(Key("replaced")));
    assert_eq!(registry.len(), 1);
}

#[test]
fn unregistered_capability_is_absent() {
    let registry = Registry::new();
    assert!(registry.resolve::<Key>().is_none());
    assert!(!registry.unregister::<Key>());

    registry.register_instance(Key("present"));
    assert!(registry.unregister::<Key>());
    assert!(registry.resolve::<Key>().is_none());
    assert!(registry.is_empty());
}

#[test]
fn trait_objects_are_capabilities() {
    let registry = Registry::new();
    registry.register_shared::<Arc<dyn Analytics>, _>(|_| Some(Arc::new(Console)));

    let analytics = registry.resolve::<Arc<dyn Analytics>>().unwrap();
    assert_eq!(analytics.name(), "console");
    assert_eq!(registry.discipline::<Arc<dyn Analytics>>(), Some(Discipline::Shared));
    assert!(registry.capabilities()[0].contains("Analytics"));
}

#[test]
fn scopes_shadow_and_fall_back_without_leaking() {
    let root = Registry::new();
    root.register_instance::<Arc<dyn Analytics>>(Arc::new(Console));
    root.register_instance(Key("root"));

    let scope = root.scope();
    scope.register_instance::<Arc<dyn Analytics>>(Arc::new(Silent));

    assert_eq!(scope.level(), 1);
    assert_eq!(scope.resolve::<Arc<dyn Analytics>>().unwrap().name(), "silent");
    assert_eq!(scope.resolve::<Key>(), Some(Key("root")));
    assert!(scope.contains::<Key>());
    assert_eq!(scope.len(), 1);

    drop(scope);
    assert_eq!(root.resolve::<Arc<dyn Analytics>>().unwrap().name(), "console");
}

#[test]
fn parent_factories_receive_the_parent_registry() {
    let root = Registry::new();
    root.register_instance(Key("root"));
    root.register(|r| r.resolve::<Key>().map(|k| format!("built with {}", k.0)));

    let scope = root.scope();
    scope.register_instance(Key("scope"));

    assert_eq!(scope.resolve::<String>().as_deref(), Some("built with root"));
}

#[test]
fn require_names_the_missing_capability() {
    let registry = Registry::new();
    let err = registry.require::<Arc<dyn Analytics>>().err().unwrap();

    assert!(matches!(err, RegistryError::Unresolved { .. }));
    assert!(err.to_string().contains("Analytics"), "{err}");
}

#[test]
fn concurrent_register_and_resolve_are_consistent() {
    let registry = Registry::new();
    registry.register_instance(0usize);

    let writers: Vec<_> = (1..=4usize)
        .map(|n| {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    registry.register_instance(n);
                    assert!(registry.resolve::<usize>().is_some());
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    let last = registry.resolve::<usize>().unwrap();
    assert!((1..=4).contains(&last));
    assert_eq!(registry.len(), 1);
}
