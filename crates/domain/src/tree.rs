//! Nested view of a list's items.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::id::ItemId;
use crate::item::Item;

/// An item together with its children, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemNode {
    #[serde(flatten)]
    pub item: Item,
    pub children: Vec<ItemNode>,
}

/// Nest an ordered flat list of items into a forest.
///
/// Sibling order follows the input order. Items whose parent is not in
/// `items` are kept as roots so nothing disappears from the view.
#[must_use]
pub fn build(items: Vec<Item>) -> Vec<ItemNode> {
    let present: HashSet<ItemId> = items.iter().map(|item| item.id).collect();
    let mut children: HashMap<ItemId, Vec<Item>> = HashMap::new();
    let mut roots = Vec::new();

    for item in items {
        match item.parent_id {
            Some(parent) if present.contains(&parent) => {
                children.entry(parent).or_default().push(item);
            }
            _ => roots.push(item),
        }
    }

    roots
        .into_iter()
        .map(|item| attach(item, &mut children))
        .collect()
}

fn attach(item: Item, children: &mut HashMap<ItemId, Vec<Item>>) -> ItemNode {
    let own = children.remove(&item.id).unwrap_or_default();
    ItemNode {
        children: own
            .into_iter()
            .map(|child| attach(child, children))
            .collect(),
        item,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ListId;
    use crate::order_key::OrderKey;

    fn item(list: ListId, text: &str, parent: Option<ItemId>) -> Item {
        let builder = Item::builder(list).text(text).order_key(OrderKey::whole(1));
        match parent {
            Some(parent) => builder.parent_id(parent).build(),
            None => builder.build(),
        }
    }

    #[test]
    fn should_nest_children_under_parents_in_order() {
        let list = ListId::new();
        let fruit = item(list, "Fruit", None);
        let apples = item(list, "Apples", Some(fruit.id));
        let pears = item(list, "Pears", Some(fruit.id));
        let bread = item(list, "Bread", None);

        let tree = build(vec![fruit.clone(), apples, pears, bread]);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].item.text, "Fruit");
        let names: Vec<&str> = tree[0]
            .children
            .iter()
            .map(|node| node.item.text.as_str())
            .collect();
        assert_eq!(names, vec!["Apples", "Pears"]);
        assert_eq!(tree[1].item.text, "Bread");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn should_keep_orphans_at_top_level() {
        let list = ListId::new();
        let orphan = item(list, "Orphan", Some(ItemId::new()));

        let tree = build(vec![orphan]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].item.text, "Orphan");
    }

    #[test]
    fn should_nest_several_levels_deep() {
        let list = ListId::new();
        let a = item(list, "a", None);
        let b = item(list, "b", Some(a.id));
        let c = item(list, "c", Some(b.id));

        let tree = build(vec![a, b, c]);

        assert_eq!(tree[0].children[0].children[0].item.text, "c");
    }

    #[test]
    fn should_serialize_children_next_to_item_fields() {
        let list = ListId::new();
        let tree = build(vec![item(list, "Milk", None)]);
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value[0]["text"], "Milk");
        assert!(value[0]["children"].as_array().unwrap().is_empty());
    }
}
