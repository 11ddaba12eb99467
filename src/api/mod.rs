//! REST API client module for the chatbot analytics dashboard.
//!
//! This module provides the typed `ApiClient` used by the export pipeline
//! and any other dashboard consumer. All authenticated traffic funnels
//! through `SessionManager::execute`; the client's job is to build
//! requests, validate statuses, and parse payloads so business logic never
//! touches a raw response.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiRequest};
pub use error::ApiError;
