use proptest::prelude::*;
use wf_registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Left(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Right(u32);

#[derive(Debug, Clone)]
enum Op {
    Register { left: bool, value: u32, shared: bool },
    Unregister { left: bool },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), any::<u32>(), any::<bool>())
            .prop_map(|(left, value, shared)| Op::Register { left, value, shared }),
        any::<bool>().prop_map(|left| Op::Unregister { left }),
    ]
}

fn register(registry: &Registry, left: bool, value: u32, shared: bool) {
    match (left, shared) {
        (true, true) => registry.register_shared(move |_| Some(Left(value))),
        (true, false) => registry.register(move |_| Some(Left(value))),
        (false, true) => registry.register_shared(move |_| Some(Right(value))),
        (false, false) => registry.register(move |_| Some(Right(value))),
    }
}

proptest! {
    #[test]
    fn resolve_tracks_latest_registration(ops in proptest::collection::vec(op(), 0..64)) {
        let registry = Registry::new();
        let mut left = None;
        let mut right = None;

        for op in ops {
            match op {
                Op::Register { left: true, value, shared } => {
                    register(&registry, true, value, shared);
                    left = Some(value);
                },
                Op::Register { left: false, value, shared } => {
                    register(&registry, false, value, shared);
                    right = Some(value);
                },
                Op::Unregister { left: true } => {
                    registry.unregister::<Left>();
                    left = None;
                },
                Op::Unregister { left: false } => {
                    registry.unregister::<Right>();
                    right = None;
                },
            }

            prop_assert_eq!(registry.resolve::<Left>(), left.map(Left));
            prop_assert_eq!(registry.resolve::<Right>(), right.map(Right));
        }
    }

    #[test]
    fn scoped_registrations_never_reach_the_parent(value in any::<u32>()) {
        let root = Registry::new();
        let scope = root.scope();
        scope.register_instance(Left(value));

        prop_assert_eq!(scope.resolve::<Left>(), Some(Left(value)));
        prop_assert!(root.resolve::<Left>().is_none());
    }
}
