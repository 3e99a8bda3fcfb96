//! Handyman Emporium: an HTTP catalog of shop items.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use catalog::{Category, Item, ItemStore};
pub use config::EmporiumConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
