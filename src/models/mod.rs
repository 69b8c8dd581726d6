//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response shapes built from them.

/// Business model
pub mod business;
/// Order model
pub mod order;
/// Browser session model
pub mod session;
/// Account holder model
pub mod user;
