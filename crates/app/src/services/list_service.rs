//! List service: use-cases for managing shopping lists.

use shoplist_domain::error::{NotFoundError, ShoppingListError};
use shoplist_domain::event::Event;
use shoplist_domain::id::ListId;
use shoplist_domain::list::{List, ListStatus};

use super::publish_detached;
use crate::ports::{EventPublisher, ListRepository};

/// Application service for list operations.
pub struct ListService<R, P> {
    repo: R,
    publisher: P,
}

impl<R, P> ListService<R, P>
where
    R: ListRepository,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    /// Create a new service backed by the given repository and publisher.
    pub fn new(repo: R, publisher: P) -> Self {
        Self { repo, publisher }
    }

    /// All lists, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_lists(&self) -> Result<Vec<List>, ShoppingListError> {
        self.repo
            .get_all()
            .await
            .map_err(|err| err.during("loading lists"))
    }

    /// Create an empty list with status `todo` and announce it.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn create_list(&self) -> Result<List, ShoppingListError> {
        let list = self
            .repo
            .create(List::new())
            .await
            .map_err(|err| err.during("creating list"))?;
        tracing::debug!(list_id = %list.id, "list created");
        publish_detached(&self.publisher, Event::ListCreated { list_id: list.id });
        Ok(list)
    }

    /// Look up a list by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] when no list with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_list(&self, id: ListId) -> Result<List, ShoppingListError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|err| err.during("loading list"))?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "List",
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// Change the status of a list and announce it.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] when the list does not exist,
    /// or a storage error from the repository.
    pub async fn update_status(
        &self,
        id: ListId,
        status: ListStatus,
    ) -> Result<List, ShoppingListError> {
        let mut list = self.get_list(id).await?;
        self.repo
            .update_status(id, status)
            .await
            .map_err(|err| err.during("updating list status"))?;
        list.status = status;
        tracing::debug!(list_id = %id, %status, "list status updated");
        publish_detached(&self.publisher, Event::ListUpdated { list_id: id });
        Ok(list)
    }
}
