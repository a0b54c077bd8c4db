//! # bizcard common library
//!
//! Core of the employee directory service:
//! - Directory store (employees table, inactivity clock)
//! - Bulk CSV import reconciliation
//! - Contact record (vCard) builder and QR encoder
//! - Bulk QR archive assembly
//! - Configuration loading and password hashing

pub mod api;
pub mod archive;
pub mod config;
pub mod db;
pub mod error;
pub mod pagination;
pub mod qr;
pub mod reconcile;
pub mod time;
pub mod vcard;

pub use db::models::Employee;
pub use error::{Error, Result};
