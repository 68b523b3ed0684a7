//! # shoplist-app
//!
//! Application layer: use-cases, **port definitions** (traits) and the
//! in-process event hub.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ListRepository`: create, fetch and re-status lists
//!   - `ItemRepository`: item CRUD plus re-parenting and re-keying
//!   - `EventPublisher`: hand change notifications to subscribers
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ListService`: create, list, get, update status
//!   - `ItemService`: create, edit, move, cascade delete, tree view
//! - Provide **in-process infrastructure** (`EventHub`) that doesn't need IO
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `shoplist-domain` only (plus `tokio::sync` for mailboxes and
//! locks). Never imports adapter crates. Adapters depend on *this* crate, not
//! the reverse.

pub mod event_hub;
pub mod ports;
pub mod services;
