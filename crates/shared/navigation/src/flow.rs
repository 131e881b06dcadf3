use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Opaque cross-feature token for flows that span several features.
///
/// Builders pass it down unchanged; only the features that started the flow
/// know its concrete type and recover it with [`downcast_flow`].
pub trait FlowManager: Any + Debug + Send + Sync {
    fn flow_id(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

/// Recovers the concrete flow, or `None` when `flow` belongs to another feature.
#[must_use]
pub fn downcast_flow<F: FlowManager>(flow: &Arc<dyn FlowManager>) -> Option<&F> {
    flow.as_any().downcast_ref::<F>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Onboarding(String);

    impl FlowManager for Onboarding {
        fn flow_id(&self) -> &str {
            &self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Other;

    impl FlowManager for Other {
        fn flow_id(&self) -> &str {
            "other"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn downcast_recognises_only_its_own_flow() {
        let flow: Arc<dyn FlowManager> = Arc::new(Onboarding("onboarding-1".into()));
        assert_eq!(downcast_flow::<Onboarding>(&flow).map(|f| f.0.as_str()), Some("onboarding-1"));
        assert!(downcast_flow::<Other>(&flow).is_none());
        assert_eq!(flow.flow_id(), "onboarding-1");
    }
}
