//! Authentication module for managing the dashboard session.
//!
//! This module provides:
//! - `SessionManager`: bearer-token lifecycle (login, refresh, logout) and
//!   the authorized-request primitive with one-shot refresh-and-retry
//! - `TokenStore`: durable storage of the token pair
//! - `CredentialStore`: OS-keychain storage of login credentials via keyring
//!
//! The token pair is exclusively owned by the `SessionManager`; consumers
//! observe derived state (`is_authenticated`) only.

pub mod session;
pub mod store;

pub use session::{Credential, SessionManager};
pub use store::{CredentialStore, TokenStore};
