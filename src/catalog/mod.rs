//! Item catalog.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → item.rs (decode Item / ItemQuery / ItemPatch, check constraints)
//!     → store.rs (look up, scan or mutate the id → Item map)
//!     → Item(s) or CatalogError back to the handler
//! ```
//!
//! # Design Decisions
//! - One flat map keyed by integer id, no persistence
//! - Reads return owned snapshots so no map lock outlives a call
//! - Filtering is a linear scan with an equality predicate

pub mod item;
pub mod store;

pub use item::{Category, FieldError, Item, ItemPatch, ItemQuery};
pub use store::{CatalogError, ItemStore};
