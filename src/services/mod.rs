//! Business logic services.
//!
//! Services contain the ownership rules separated from HTTP handlers.
//! They handle database transactions, validation, and normalization.

pub mod account_service;
pub mod business_service;
pub mod credentials;
pub mod order_service;
pub mod session_service;
