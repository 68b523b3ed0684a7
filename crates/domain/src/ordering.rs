//! Order maintenance over a snapshot of one list's items.
//!
//! Everything here is pure: the app layer loads a [`Snapshot`], asks it for a
//! [`MovePlan`] and writes the plan back through the item repository.

use std::collections::{HashMap, HashSet};

use crate::error::{IllegalTreeError, NotFoundError, ShoppingListError};
use crate::id::ItemId;
use crate::item::{Item, Placement};
use crate::order_key::OrderKey;

/// Items of a single list, sorted by order key (ties broken by id).
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

/// Neighbours a moved item will be placed between.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors<'a> {
    pub parent: Option<ItemId>,
    pub after: Option<&'a Item>,
    pub before: Option<&'a Item>,
}

/// Outcome of planning a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub parent: Option<ItemId>,
    /// `None` when the target group has run out of room between the two
    /// neighbours and must be renumbered first.
    pub order_key: Option<OrderKey>,
}

impl Snapshot {
    #[must_use]
    pub fn new(mut items: Vec<Item>) -> Self {
        sort_items(&mut items);
        let index = build_index(&items);
        Self { items, index }
    }

    /// All items in ascending order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    /// Look up an item, failing with [`NotFoundError`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when `id` is not part of the snapshot.
    pub fn require(&self, id: ItemId) -> Result<&Item, NotFoundError> {
        self.get(id).ok_or_else(|| NotFoundError {
            entity: "Item",
            id: id.to_string(),
        })
    }

    /// The sibling group under `parent`, in ascending order.
    pub fn children(&self, parent: Option<ItemId>) -> impl DoubleEndedIterator<Item = &Item> {
        self.items
            .iter()
            .filter(move |item| item.parent_id == parent)
    }

    /// `start` followed by its parent, grandparent, …
    ///
    /// Stops at a top-level item, at a parent missing from the snapshot, or
    /// when an already visited item shows up again.
    #[must_use]
    pub fn ancestors(&self, start: ItemId) -> Ancestors<'_> {
        Ancestors {
            snapshot: self,
            next: self.get(start),
            seen: HashSet::new(),
        }
    }

    /// Find the neighbours `moving` would sit between after `placement`.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] when the anchor or the target
    /// parent is not in this list.
    pub fn resolve(
        &self,
        moving: ItemId,
        placement: Placement,
    ) -> Result<Neighbors<'_>, ShoppingListError> {
        match placement {
            Placement::After(anchor) => {
                let after = self.require(anchor)?;
                let before = self
                    .children(after.parent_id)
                    .skip_while(|item| item.id != anchor)
                    .skip(1)
                    .find(|item| item.id != moving);
                Ok(Neighbors {
                    parent: after.parent_id,
                    after: Some(after),
                    before,
                })
            }
            Placement::FirstChildOf(parent) => {
                self.require(parent)?;
                let before = self
                    .children(Some(parent))
                    .find(|item| item.id != moving);
                Ok(Neighbors {
                    parent: Some(parent),
                    after: None,
                    before,
                })
            }
        }
    }

    /// Reject a reparent that would make `moving` its own ancestor.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalTreeError`] when `moving` is `new_parent` or one of its
    /// ancestors.
    pub fn ensure_acyclic(
        &self,
        moving: ItemId,
        new_parent: Option<ItemId>,
    ) -> Result<(), IllegalTreeError> {
        let Some(parent) = new_parent else {
            return Ok(());
        };
        if self.ancestors(parent).any(|item| item.id == moving) {
            return Err(IllegalTreeError {
                item: moving.to_string(),
                parent: parent.to_string(),
            });
        }
        Ok(())
    }

    /// Resolve neighbours, check the tree stays acyclic and compute the key.
    ///
    /// # Errors
    ///
    /// Returns [`ShoppingListError::NotFound`] for a missing anchor and
    /// [`ShoppingListError::IllegalTree`] for a cycle.
    pub fn plan_move(
        &self,
        moving: ItemId,
        placement: Placement,
    ) -> Result<MovePlan, ShoppingListError> {
        let neighbors = self.resolve(moving, placement)?;
        self.ensure_acyclic(moving, neighbors.parent)?;
        let order_key = OrderKey::between(
            neighbors.after.map(|item| item.order_key),
            neighbors.before.map(|item| item.order_key),
        );
        Ok(MovePlan {
            parent: neighbors.parent,
            order_key,
        })
    }

    /// Key for a new item appended after the last top-level item.
    #[must_use]
    pub fn plan_append(&self) -> Option<OrderKey> {
        let last = self.children(None).map(|item| item.order_key).max();
        OrderKey::between(last, None)
    }

    /// Fresh keys `1/1, 2/1, …` for the group under `parent`, in its current
    /// order, leaving out `excluding`.
    #[must_use]
    pub fn renumber(
        &self,
        parent: Option<ItemId>,
        excluding: Option<ItemId>,
    ) -> Vec<(ItemId, OrderKey)> {
        self.children(parent)
            .filter(|item| Some(item.id) != excluding)
            .zip(1_u64..)
            .map(|(item, n)| (item.id, OrderKey::whole(n)))
            .collect()
    }

    /// Record a new parent and key for `id`, keeping the snapshot sorted.
    pub fn apply(&mut self, id: ItemId, parent: Option<ItemId>, order_key: OrderKey) {
        if let Some(&pos) = self.index.get(&id) {
            let item = &mut self.items[pos];
            item.parent_id = parent;
            item.order_key = order_key;
            sort_items(&mut self.items);
            self.index = build_index(&self.items);
        }
    }
}

/// Iterator returned by [`Snapshot::ancestors`].
pub struct Ancestors<'a> {
    snapshot: &'a Snapshot,
    next: Option<&'a Item>,
    seen: HashSet<ItemId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if !self.seen.insert(current.id) {
            return None;
        }
        self.next = current
            .parent_id
            .and_then(|parent| self.snapshot.get(parent));
        Some(current)
    }
}

fn sort_items(items: &mut [Item]) {
    items.sort_by(|a, b| a.order_key.cmp(&b.order_key).then(a.id.cmp(&b.id)));
}

fn build_index(items: &[Item]) -> HashMap<ItemId, usize> {
    items
        .iter()
        .enumerate()
        .map(|(pos, item)| (item.id, pos))
        .collect()
}
