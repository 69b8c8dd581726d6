//! HTTP middleware components.
//!
//! Middleware and extractors that run before route handlers to establish
//! who is calling.

/// API key and session authentication
pub mod auth;
