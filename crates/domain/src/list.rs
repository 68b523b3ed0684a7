//! List: a shopping list owning a forest of items.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::ListId;
use crate::time::{Timestamp, now};

/// Progress of a shopping trip. Any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl ListStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "inprogress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub status: ListStatus,
    #[serde(rename = "date")]
    pub created_at: Timestamp,
}

impl List {
    /// A fresh list in the `todo` state, created now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ListId::new(),
            status: ListStatus::default(),
            created_at: now(),
        }
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_new_list_as_todo() {
        let list = List::new();
        assert_eq!(list.status, ListStatus::Todo);
    }

    #[test]
    fn should_parse_known_statuses() {
        assert_eq!("todo".parse::<ListStatus>().unwrap(), ListStatus::Todo);
        assert_eq!(
            "inprogress".parse::<ListStatus>().unwrap(),
            ListStatus::InProgress
        );
        assert_eq!("done".parse::<ListStatus>().unwrap(), ListStatus::Done);
    }

    #[test]
    fn should_reject_unknown_status() {
        let result = "archived".parse::<ListStatus>();
        assert_eq!(
            result,
            Err(ValidationError::UnknownStatus("archived".to_string()))
        );
    }

    #[test]
    fn should_serialize_status_in_lowercase() {
        let json = serde_json::to_string(&ListStatus::InProgress).unwrap();
        assert_eq!(json, "\"inprogress\"");
    }

    #[test]
    fn should_serialize_creation_time_as_date() {
        let value = serde_json::to_value(List::new()).unwrap();
        assert!(value.get("date").is_some());
        assert_eq!(value["status"], "todo");
    }
}
