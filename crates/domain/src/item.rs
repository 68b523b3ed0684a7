//! Item: one checklist entry of a shopping list, possibly nested under another.

use serde::{Deserialize, Serialize};

use crate::id::{ItemId, ListId};
use crate::order_key::OrderKey;

/// A checklist entry.
///
/// Items of one list form a forest: `parent_id` points at another item of the
/// same list, or is `None` for a top-level item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub list_id: ListId,
    pub text: String,
    pub checked: bool,
    pub parent_id: Option<ItemId>,
    pub order_key: OrderKey,
}

impl Item {
    /// Create a builder for constructing an [`Item`].
    #[must_use]
    pub fn builder(list_id: ListId) -> ItemBuilder {
        ItemBuilder {
            list_id,
            text: String::new(),
            parent_id: None,
            order_key: OrderKey::whole(1),
        }
    }
}

/// Step-by-step builder for [`Item`].
#[derive(Debug)]
pub struct ItemBuilder {
    list_id: ListId,
    text: String,
    parent_id: Option<ItemId>,
    order_key: OrderKey,
}

impl ItemBuilder {
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn parent_id(mut self, parent_id: ItemId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    #[must_use]
    pub fn order_key(mut self, order_key: OrderKey) -> Self {
        self.order_key = order_key;
        self
    }

    /// Consume the builder and return an [`Item`].
    #[must_use]
    pub fn build(self) -> Item {
        Item {
            id: ItemId::new(),
            list_id: self.list_id,
            text: self.text,
            checked: false,
            parent_id: self.parent_id,
            order_key: self.order_key,
        }
    }
}

/// Where a moved item should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Directly after the given item, in that item's sibling group.
    After(ItemId),
    /// As the first child of the given item.
    FirstChildOf(ItemId),
}

/// Partial update of an item's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub text: Option<String>,
    pub checked: Option<bool>,
}

impl ItemPatch {
    /// `true` when the patch carries no change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.checked.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_unchecked_top_level_item_by_default() {
        let list = ListId::new();
        let item = Item::builder(list).text("Milk").build();
        assert_eq!(item.list_id, list);
        assert_eq!(item.text, "Milk");
        assert!(!item.checked);
        assert!(item.parent_id.is_none());
    }

    #[test]
    fn should_report_empty_patch() {
        assert!(ItemPatch::default().is_empty());
        let patch = ItemPatch {
            checked: Some(true),
            ..ItemPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
