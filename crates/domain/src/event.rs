//! Event: a coarse change notification pushed to live clients.
//!
//! Events carry only the affected list id; clients refetch what they need.

use serde::{Deserialize, Serialize};

use crate::id::ListId;

/// Change notification broadcast to every subscriber.
///
/// Serializes as `{"type": "LIST_CREATED", "listID": "<uuid>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    ListCreated {
        #[serde(rename = "listID")]
        list_id: ListId,
    },
    ListUpdated {
        #[serde(rename = "listID")]
        list_id: ListId,
    },
    ItemsInListChanged {
        #[serde(rename = "listID")]
        list_id: ListId,
    },
}

impl Event {
    /// The list this event is about.
    #[must_use]
    pub fn list_id(&self) -> ListId {
        match self {
            Self::ListCreated { list_id }
            | Self::ListUpdated { list_id }
            | Self::ItemsInListChanged { list_id } => *list_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_to_wire_format() {
        let list_id = ListId::new();
        let cases = [
            (Event::ListCreated { list_id }, "LIST_CREATED"),
            (Event::ListUpdated { list_id }, "LIST_UPDATED"),
            (Event::ItemsInListChanged { list_id }, "ITEMS_IN_LIST_CHANGED"),
        ];
        for (event, tag) in cases {
            let value = serde_json::to_value(event).unwrap();
            assert_eq!(value["type"], tag);
            assert_eq!(value["listID"], list_id.to_string());
            assert_eq!(value.as_object().unwrap().len(), 2);
        }
    }

    #[test]
    fn should_parse_wire_format() {
        let list_id = ListId::new();
        let json = format!(r#"{{"type":"ITEMS_IN_LIST_CHANGED","listID":"{list_id}"}}"#);
        let event: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, Event::ItemsInListChanged { list_id });
        assert_eq!(event.list_id(), list_id);
    }
}
