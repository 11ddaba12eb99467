//! botmetrics - client core for a chatbot analytics admin dashboard.
//!
//! This crate provides the two pieces every dashboard surface builds on:
//!
//! - `auth`: bearer-token session management with transparent
//!   refresh-and-retry on expiry
//! - `export`: aggregation of the dashboard's read endpoints into
//!   downloadable CSV / Excel / printable-report documents
//!
//! UI concerns (routing, rendering, charts) live with the consumer; the
//! crate exposes typed data and serialized artifacts only.

pub mod api;
pub mod auth;
pub mod config;
pub mod export;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiRequest};
pub use auth::{Credential, CredentialStore, SessionManager, TokenStore};
pub use config::{ApiConfig, Config};
pub use export::{Document, ExportFormat, Exporter};
