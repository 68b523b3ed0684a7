//! Item service: creating, editing, moving and deleting list items.
//!
//! Every structural change (create, move, cascade delete) runs under a
//! per-list lock so the snapshot a move is planned on cannot go stale before
//! the new order key is written.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use shoplist_domain::error::{NotFoundError, ShoppingListError, ValidationError};
use shoplist_domain::event::Event;
use shoplist_domain::id::{ItemId, ListId};
use shoplist_domain::item::{Item, ItemPatch, Placement};
use shoplist_domain::order_key::OrderKey;
use shoplist_domain::ordering::Snapshot;
use shoplist_domain::tree::{self, ItemNode};

use super::publish_detached;
use crate::ports::{EventPublisher, ItemRepository, ListRepository};

/// One async mutex per list with structural work in flight.
///
/// An entry only referenced by the map is idle and gets pruned on the next
/// acquire, so the map stays as small as the number of busy lists.
#[derive(Default)]
struct ListLocks(Mutex<HashMap<ListId, Arc<tokio::sync::Mutex<()>>>>);

impl ListLocks {
    async fn acquire(&self, list_id: ListId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|id, lock| *id == list_id || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(list_id).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Application service for item operations.
pub struct ItemService<L, I, P> {
    lists: L,
    items: I,
    publisher: P,
    locks: ListLocks,
}

impl<L, I, P> ItemService<L, I, P>
where
    L: ListRepository,
    I: ItemRepository,
    P: EventPublisher + Clone + Send + Sync + 'static,
{
    pub fn new(lists: L, items: I, publisher: P) -> Self {
        Self {
            lists,
            items,
            publisher,
            locks: ListLocks::default(),
        }
    }

    /// All items of a list in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] when the list does not exist,
    /// or a storage error from the repository.
    pub async fn list_items(&self, list_id: ListId) -> Result<Vec<Item>, ShoppingListError> {
        self.ensure_list(list_id).await?;
        self.items
            .find_all_by_list(list_id)
            .await
            .map_err(|err| err.during("loading items"))
    }

    /// Items of a list nested under their parents.
    ///
    /// # Errors
    ///
    /// Same as [`list_items`](Self::list_items).
    pub async fn item_tree(&self, list_id: ListId) -> Result<Vec<ItemNode>, ShoppingListError> {
        let items = self.list_items(list_id).await?;
        Ok(tree::build(items))
    }

    /// Look up an item of `list_id`.
    ///
    /// An item that exists but belongs to another list is reported as
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] or a storage error.
    pub async fn get_item(
        &self,
        list_id: ListId,
        item_id: ItemId,
    ) -> Result<Item, ShoppingListError> {
        self.items
            .find_by_id(item_id)
            .await
            .map_err(|err| err.during("loading item"))?
            .filter(|item| item.list_id == list_id)
            .ok_or_else(|| item_not_found(item_id))
    }

    /// Append a new top-level item after the current last one, optionally
    /// moving it straight after `after`.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] when the list or the anchor
    /// does not exist, or a storage error from the repository.
    pub async fn create_item(
        &self,
        list_id: ListId,
        text: String,
        after: Option<ItemId>,
    ) -> Result<Item, ShoppingListError> {
        self.ensure_list(list_id).await?;
        let _guard = self.locks.acquire(list_id).await;

        let mut snapshot = self.snapshot(list_id).await?;
        if let Some(anchor) = after {
            snapshot.require(anchor)?;
        }
        let order_key = match snapshot.plan_append() {
            Some(key) => key,
            None => {
                self.renumber(&mut snapshot, None, None).await?;
                snapshot
                    .plan_append()
                    .ok_or(ValidationError::OrderKeyExhausted)?
            }
        };

        let item = Item::builder(list_id)
            .text(text)
            .order_key(order_key)
            .build();
        let mut item = self
            .items
            .create(item)
            .await
            .map_err(|err| err.during("creating item"))?;
        tracing::debug!(item_id = %item.id, %list_id, %order_key, "item created");

        if let Some(anchor) = after {
            let (parent_id, order_key) = self
                .move_locked(list_id, item.id, Placement::After(anchor))
                .await?;
            item.parent_id = parent_id;
            item.order_key = order_key;
        }

        self.notify(list_id);
        Ok(item)
    }

    /// Apply a partial update to an item's text and checked flag.
    ///
    /// An empty patch changes nothing and publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] when the item is not part of
    /// `list_id`, or a storage error from the repository.
    pub async fn update_item(
        &self,
        list_id: ListId,
        item_id: ItemId,
        patch: ItemPatch,
    ) -> Result<Item, ShoppingListError> {
        let mut item = self.get_item(list_id, item_id).await?;
        if patch.is_empty() {
            return Ok(item);
        }

        if let Some(checked) = patch.checked {
            self.items
                .update_checked(item_id, checked)
                .await
                .map_err(|err| err.during("updating item checked state"))?;
            item.checked = checked;
        }
        if let Some(text) = patch.text {
            self.items
                .update_text(item_id, text.clone())
                .await
                .map_err(|err| err.during("updating item text"))?;
            item.text = text;
        }

        tracing::debug!(%item_id, %list_id, "item updated");
        self.notify(list_id);
        Ok(item)
    }

    /// Move an item after a sibling or to the front of another item's
    /// children.
    ///
    /// # Errors
    ///
    /// - [`ShoppingListError::NotFound`] when the item, the anchor or the new
    ///   parent is not part of `list_id`
    /// - [`ShoppingListError::IllegalTree`] when the item would become its
    ///   own ancestor; nothing is written in that case
    /// - a storage error from the repository
    pub async fn move_item(
        &self,
        list_id: ListId,
        item_id: ItemId,
        placement: Placement,
    ) -> Result<Item, ShoppingListError> {
        let mut item = self.get_item(list_id, item_id).await?;
        let _guard = self.locks.acquire(list_id).await;

        let (parent_id, order_key) = self.move_locked(list_id, item_id, placement).await?;
        item.parent_id = parent_id;
        item.order_key = order_key;

        self.notify(list_id);
        Ok(item)
    }

    /// Delete an item, lifting its children into its sibling group in the
    /// position it occupied.
    ///
    /// The children keep their relative order. The steps are separate store
    /// writes: a failure midway leaves some children already lifted.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] when the item is not part of
    /// `list_id`, or a storage error from the repository.
    pub async fn delete_item(
        &self,
        list_id: ListId,
        item_id: ItemId,
    ) -> Result<(), ShoppingListError> {
        self.get_item(list_id, item_id).await?;
        let _guard = self.locks.acquire(list_id).await;

        let snapshot = self.snapshot(list_id).await?;
        let children: Vec<ItemId> = snapshot
            .children(Some(item_id))
            .rev()
            .map(|child| child.id)
            .collect();
        for child in children {
            self.move_locked(list_id, child, Placement::After(item_id))
                .await?;
        }

        self.items
            .delete(item_id)
            .await
            .map_err(|err| err.during("deleting item"))?;
        tracing::debug!(%item_id, %list_id, "item deleted");

        self.notify(list_id);
        Ok(())
    }

    /// Plan and persist one move. The caller holds the list lock.
    async fn move_locked(
        &self,
        list_id: ListId,
        item_id: ItemId,
        placement: Placement,
    ) -> Result<(Option<ItemId>, OrderKey), ShoppingListError> {
        let mut snapshot = self.snapshot(list_id).await?;
        let plan = snapshot.plan_move(item_id, placement)?;
        let order_key = match plan.order_key {
            Some(key) => key,
            None => {
                self.renumber(&mut snapshot, plan.parent, Some(item_id))
                    .await?;
                snapshot
                    .plan_move(item_id, placement)?
                    .order_key
                    .ok_or(ValidationError::OrderKeyExhausted)?
            }
        };

        self.items
            .set_parent_and_order(item_id, plan.parent, order_key)
            .await
            .map_err(|err| err.during("moving item"))?;
        tracing::debug!(
            %item_id,
            %list_id,
            parent_id = ?plan.parent,
            %order_key,
            "item moved"
        );
        Ok((plan.parent, order_key))
    }

    /// Spread the keys of one sibling group back to `1/1, 2/1, …`.
    async fn renumber(
        &self,
        snapshot: &mut Snapshot,
        parent: Option<ItemId>,
        excluding: Option<ItemId>,
    ) -> Result<(), ShoppingListError> {
        let fresh = snapshot.renumber(parent, excluding);
        tracing::info!(parent_id = ?parent, items = fresh.len(), "renumbering sibling group");
        for (id, key) in fresh {
            self.items
                .set_parent_and_order(id, parent, key)
                .await
                .map_err(|err| err.during("renumbering items"))?;
            snapshot.apply(id, parent, key);
        }
        Ok(())
    }

    async fn snapshot(&self, list_id: ListId) -> Result<Snapshot, ShoppingListError> {
        let items = self
            .items
            .find_all_by_list(list_id)
            .await
            .map_err(|err| err.during("loading items"))?;
        Ok(Snapshot::new(items))
    }

    async fn ensure_list(&self, list_id: ListId) -> Result<(), ShoppingListError> {
        self.lists
            .get_by_id(list_id)
            .await
            .map_err(|err| err.during("loading list"))?
            .map(|_| ())
            .ok_or_else(|| {
                NotFoundError {
                    entity: "List",
                    id: list_id.to_string(),
                }
                .into()
            })
    }

    fn notify(&self, list_id: ListId) {
        publish_detached(&self.publisher, Event::ItemsInListChanged { list_id });
    }
}

fn item_not_found(id: ItemId) -> ShoppingListError {
    NotFoundError {
        entity: "Item",
        id: id.to_string(),
    }
    .into()
}
