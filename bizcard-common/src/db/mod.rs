//! Database models and queries

pub mod activity;
pub mod employees;
pub mod init;
pub mod models;

pub use activity::*;
pub use employees::*;
pub use init::*;
pub use models::*;
