use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;
use wf_domain::catalog::ItemId;
use wf_kernel::safe_nanoid;
use wf_navigation::FlowManager;

/// The cross-feature token of one purchase, from the screen that started it
/// through checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseFlow {
    id: String,
    item: ItemId,
    origin: Cow<'static, str>,
}

impl PurchaseFlow {
    pub fn new(item: ItemId, origin: impl Into<Cow<'static, str>>) -> Self {
        Self { id: format!("purchase-{}", safe_nanoid!()), item, origin: origin.into() }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn item(&self) -> ItemId {
        self.item
    }

    /// The feature that started the purchase.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn into_token(self) -> Arc<dyn FlowManager> {
        Arc::new(self)
    }
}

impl FlowManager for PurchaseFlow {
    fn flow_id(&self) -> &str {
        &self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_navigation::downcast_flow;

    #[test]
    fn flows_are_unique_and_recoverable() {
        let a = PurchaseFlow::new(ItemId(1), "detail");
        let b = PurchaseFlow::new(ItemId(1), "detail");
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("purchase-"));

        let token = a.clone().into_token();
        assert_eq!(token.flow_id(), a.id());
        assert_eq!(downcast_flow::<PurchaseFlow>(&token), Some(&a));
    }
}
