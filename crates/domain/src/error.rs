//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ShoppingListError`] via `#[from]`, so callers can match on the kind of
//! failure without inspecting messages.

/// Top-level error returned by services and repository ports.
#[derive(Debug, thiserror::Error)]
pub enum ShoppingListError {
    /// The request was malformed.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced item, list or anchor does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A reparent would make an item its own ancestor.
    #[error("illegal tree")]
    IllegalTree(#[from] IllegalTreeError),

    /// Opaque persistence failure.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ShoppingListError {
    /// Attach the name of the failing operation to a storage error.
    ///
    /// Only [`ShoppingListError::Storage`] is wrapped; the other kinds are
    /// already self-describing and pass through unchanged so callers can
    /// still match on them.
    #[must_use]
    pub fn during(self, operation: &'static str) -> Self {
        match self {
            Self::Storage(source) => Self::Storage(Box::new(OperationFailed { operation, source })),
            other => other,
        }
    }
}

/// Storage failure annotated with the operation that triggered it.
#[derive(Debug, thiserror::Error)]
#[error("failed while {operation}")]
pub struct OperationFailed {
    pub operation: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Malformed input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Status string outside `todo`, `inprogress`, `done`.
    #[error("unknown list status {0:?}")]
    UnknownStatus(String),

    /// An identifier could not be parsed.
    #[error("invalid {kind} id {value:?}")]
    InvalidId { kind: &'static str, value: String },

    /// A move request named neither or both of `afterId` and `parentId`.
    #[error("move requires exactly one of afterId or parentId")]
    AmbiguousPlacement,

    /// An order key with a zero denominator.
    #[error("order key denominator must be positive")]
    ZeroDenominator,

    /// A sibling group could not fit a new key even after renumbering.
    #[error("no room left for a new order key")]
    OrderKeyExhausted,
}

/// A referenced record is absent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Reparenting `item` under `parent` would close a cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("moving {item} under {parent} would create a cycle")]
pub struct IllegalTreeError {
    pub item: String,
    pub parent: String,
}
