//! Shared authentication primitives
//!
//! Pure functions only; the session cookie and request gate live in the web
//! crate and wrap these.

pub mod auth;

pub use auth::{hash_password, PasswordHash};
