use crate::error::CatalogError;
use std::fmt::Debug;
use std::sync::Arc;
use wf_domain::catalog::Item;
use wf_kernel::ItemRepository;

pub trait CatalogService: Debug + Send + Sync {
    /// Items to list, ordered by id.
    ///
    /// # Errors
    /// Returns [`CatalogError::Empty`] when there is nothing to show.
    fn items(&self) -> Result<Vec<Item>, CatalogError>;
}

#[derive(Debug)]
pub struct CatalogInteractor {
    repository: Arc<dyn ItemRepository>,
}

impl CatalogInteractor {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }
}

impl CatalogService for CatalogInteractor {
    fn items(&self) -> Result<Vec<Item>, CatalogError> {
        let mut items = self.repository.items();
        if items.is_empty() {
            return Err(CatalogError::Empty { message: "no items to list".into(), context: None });
        }
        items.sort_by_key(|item| item.id);
        Ok(items)
    }
}
