//! # shoplist-domain
//!
//! Pure domain model for the shoplist shared shopping-list service.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Lists** and their status
//! - Define **Items**, the checklist entries forming a forest per list
//! - Define **Order keys**, exact rationals ordering items among siblings
//! - Define **Events**, the change notifications pushed to live clients
//! - Contain the order-maintenance computations (neighbour resolution,
//!   mediant insertion, cycle guard) and the nested tree view
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod item;
pub mod list;
pub mod order_key;
pub mod ordering;
pub mod tree;
