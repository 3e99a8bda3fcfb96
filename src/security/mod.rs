//! Request hardening.
//!
//! # Responsibilities
//! - Cap request body size (limits.rs)
//! - Add defensive response headers (headers.rs)

pub mod headers;
pub mod limits;
