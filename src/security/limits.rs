//! Request size limits.
//!
//! The limit is enforced while a handler buffers the body, so an oversized
//! request surfaces as a `JsonRejection` and gets the usual `{"detail": ...}`
//! 413 response whether or not the client sent `Content-Length`.

use axum::extract::DefaultBodyLimit;

/// Layer enforcing `max_body_size` bytes per request body.
pub fn body_limit_layer(max_body_size: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_body_size)
}
