//! Storage port: repository traits for persistence.

use std::future::Future;

use shoplist_domain::error::ShoppingListError;
use shoplist_domain::id::{ItemId, ListId};
use shoplist_domain::item::Item;
use shoplist_domain::list::{List, ListStatus};
use shoplist_domain::order_key::OrderKey;

/// Repository for persisting and querying [`Item`]s.
pub trait ItemRepository {
    /// All items of a list, ascending by order key (ties broken by id).
    fn find_all_by_list(
        &self,
        list_id: ListId,
    ) -> impl Future<Output = Result<Vec<Item>, ShoppingListError>> + Send;

    /// Get an item by its unique identifier.
    fn find_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, ShoppingListError>> + Send;

    /// Persist a new item.
    fn create(&self, item: Item) -> impl Future<Output = Result<Item, ShoppingListError>> + Send;

    fn update_text(
        &self,
        id: ItemId,
        text: String,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send;

    fn update_checked(
        &self,
        id: ItemId,
        checked: bool,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send;

    /// Re-attach an item and give it a new position in its sibling group.
    fn set_parent_and_order(
        &self,
        id: ItemId,
        parent_id: Option<ItemId>,
        order_key: OrderKey,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send;

    /// Delete an item by its unique identifier.
    fn delete(&self, id: ItemId) -> impl Future<Output = Result<(), ShoppingListError>> + Send;
}

/// Repository for persisting and querying [`List`]s.
pub trait ListRepository {
    /// Persist a new list.
    fn create(&self, list: List) -> impl Future<Output = Result<List, ShoppingListError>> + Send;

    /// Get a list by its unique identifier.
    fn get_by_id(
        &self,
        id: ListId,
    ) -> impl Future<Output = Result<Option<List>, ShoppingListError>> + Send;

    /// All lists, newest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<List>, ShoppingListError>> + Send;

    fn update_status(
        &self,
        id: ListId,
        status: ListStatus,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send;
}

impl<T: ItemRepository + Send + Sync> ItemRepository for std::sync::Arc<T> {
    fn find_all_by_list(
        &self,
        list_id: ListId,
    ) -> impl Future<Output = Result<Vec<Item>, ShoppingListError>> + Send {
        (**self).find_all_by_list(list_id)
    }

    fn find_by_id(
        &self,
        id: ItemId,
    ) -> impl Future<Output = Result<Option<Item>, ShoppingListError>> + Send {
        (**self).find_by_id(id)
    }

    fn create(&self, item: Item) -> impl Future<Output = Result<Item, ShoppingListError>> + Send {
        (**self).create(item)
    }

    fn update_text(
        &self,
        id: ItemId,
        text: String,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        (**self).update_text(id, text)
    }

    fn update_checked(
        &self,
        id: ItemId,
        checked: bool,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        (**self).update_checked(id, checked)
    }

    fn set_parent_and_order(
        &self,
        id: ItemId,
        parent_id: Option<ItemId>,
        order_key: OrderKey,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        (**self).set_parent_and_order(id, parent_id, order_key)
    }

    fn delete(&self, id: ItemId) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        (**self).delete(id)
    }
}

impl<T: ListRepository + Send + Sync> ListRepository for std::sync::Arc<T> {
    fn create(&self, list: List) -> impl Future<Output = Result<List, ShoppingListError>> + Send {
        (**self).create(list)
    }

    fn get_by_id(
        &self,
        id: ListId,
    ) -> impl Future<Output = Result<Option<List>, ShoppingListError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<List>, ShoppingListError>> + Send {
        (**self).get_all()
    }

    fn update_status(
        &self,
        id: ListId,
        status: ListStatus,
    ) -> impl Future<Output = Result<(), ShoppingListError>> + Send {
        (**self).update_status(id, status)
    }
}
