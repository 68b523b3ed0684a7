//! # shoplist-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for lists and items (`/api/lists`, `/api/lists/{id}/items`, …)
//! - Serve the **websocket push channel** (`/api/events`) that forwards change
//!   notifications from the event hub to connected clients
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `shoplist-app` (for port traits, services and the event hub) and
//! `shoplist-domain` (for domain types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod push;
pub mod router;
pub mod state;
