use crate::error::DetailError;
use std::fmt::Debug;
use std::sync::Arc;
use wf_domain::catalog::{Item, ItemId};
use wf_kernel::{AnalyticsDispatcher, AnalyticsEvent, ItemRepository};

pub trait DetailService: Debug + Send + Sync {
    /// Loads the item shown by the detail screen.
    ///
    /// # Errors
    /// Returns [`DetailError::UnknownItem`] when the repository has no such item.
    fn load(&self, id: ItemId) -> Result<Item, DetailError>;
}

#[derive(Debug)]
pub struct DetailInteractor {
    items: Arc<dyn ItemRepository>,
    analytics: Arc<dyn AnalyticsDispatcher>,
}

impl DetailInteractor {
    pub fn new(items: Arc<dyn ItemRepository>, analytics: Arc<dyn AnalyticsDispatcher>) -> Self {
        Self { items, analytics }
    }
}

impl DetailService for DetailInteractor {
    fn load(&self, id: ItemId) -> Result<Item, DetailError> {
        let item = self.items.item(id).ok_or_else(|| DetailError::UnknownItem {
            message: id.to_string().into(),
            context: None,
        })?;
        self.analytics.track(AnalyticsEvent::new("item_viewed").with("item", id));
        Ok(item)
    }
}
