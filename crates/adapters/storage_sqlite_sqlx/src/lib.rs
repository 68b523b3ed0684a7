//! # shoplist-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `shoplist-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows, including the exact
//!   order-key pair and its float projection
//!
//! ## Dependency rule
//! Depends on `shoplist-app` (for port traits) and `shoplist-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod item_repo;
pub mod list_repo;
pub mod pool;

pub use item_repo::SqliteItemRepository;
pub use list_repo::SqliteListRepository;
pub use pool::{Config, Database};
