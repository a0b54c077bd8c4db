//! HTTP API handlers for bizcard-web

pub mod auth;
pub mod cards;
pub mod employees;
pub mod health;
pub mod ui;
pub mod upload;

pub use auth::{login, login_form, logout, require_session, AuthContext};
pub use cards::{download_all_qr, download_vcard, generate_qr};
pub use employees::{add_employee, list_employees};
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index};
pub use upload::upload_csv;
