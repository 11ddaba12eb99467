//! Bearer-token session lifecycle and the authorized-request primitive.
//!
//! The manager owns the access/refresh token pair: it is the only writer,
//! tokens are replaced as a pair or not at all, and every mutation is
//! mirrored into the durable [`TokenStore`]. A 401 on an authorized call
//! triggers exactly one refresh-then-retry cycle; concurrent callers
//! coalesce behind a single in-flight refresh.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::api::{ApiError, ApiRequest};
use crate::auth::store::TokenStore;
use crate::config::ApiConfig;

/// The bearer token pair issued by the login and refresh endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
}

/// Wire shape shared by `/auth/login` and `/auth/refresh` responses.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Token state plus a generation counter. The counter increments on every
/// credential change so a caller waiting on the refresh gate can tell
/// whether another caller already rotated the pair.
struct TokenState {
    credential: Option<Credential>,
    generation: u64,
}

pub struct SessionManager {
    http: Client,
    config: ApiConfig,
    store: TokenStore,
    state: RwLock<TokenState>,
    refresh_gate: Mutex<()>,
}

impl SessionManager {
    /// Create a session manager, restoring any persisted token pair.
    pub fn new(config: ApiConfig, store: TokenStore) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let credential = match store.load() {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted tokens, starting logged out");
                None
            }
        };

        Ok(Self {
            http,
            config,
            store,
            state: RwLock::new(TokenState {
                credential,
                generation: 0,
            }),
            refresh_gate: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Shared HTTP client. Clone is cheap - reqwest uses Arc internally
    /// for connection pooling.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// True iff an access token is held in memory. Says nothing about
    /// whether the server still considers it valid.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.credential.is_some()
    }

    /// Authenticate with username/password. No retry: a rejected login
    /// surfaces immediately as [`ApiError::Authentication`].
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let url = self.config.endpoint_url("/auth/login");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Login rejected");
            return Err(ApiError::Authentication);
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("login response: {}", e)))?;

        debug!(expires_in = ?tokens.expires_in, "Login succeeded");
        self.install_credential(Credential {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
        .await;
        Ok(())
    }

    /// Drop the token pair from memory and durable storage. Idempotent;
    /// performs no network call.
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear persisted tokens");
        }
        let mut state = self.state.write().await;
        state.credential = None;
        state.generation += 1;
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// Resolves `false` without a network call when no refresh token is
    /// held. Any failure (transport or non-2xx) also resolves `false` and
    /// leaves the existing pair untouched, so callers can treat "could not
    /// refresh" and "refresh rejected" uniformly. On success both tokens
    /// are replaced and persisted together.
    pub async fn refresh_access_token(&self) -> bool {
        let (refresh_token, seen_generation) = {
            let state = self.state.read().await;
            match &state.credential {
                Some(credential) => (credential.refresh_token.clone(), state.generation),
                None => return false,
            }
        };

        // Coalesce concurrent refreshes: only the first caller performs the
        // network exchange, later callers reuse the rotated pair.
        let _gate = self.refresh_gate.lock().await;
        {
            let state = self.state.read().await;
            if state.generation != seen_generation {
                return state.credential.is_some();
            }
        }

        let url = self.config.endpoint_url("/auth/refresh");
        let result = self
            .http
            .post(&url)
            .bearer_auth(&refresh_token)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Token refresh request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "Token refresh rejected");
            return false;
        }

        let tokens: TokenResponse = match response.json().await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Failed to parse refresh response");
                return false;
            }
        };

        debug!(expires_in = ?tokens.expires_in, "Access token refreshed");
        self.install_credential(Credential {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
        .await;
        true
    }

    /// The authorized-request primitive.
    ///
    /// Sends the request with `Content-Type: application/json`, any
    /// caller-supplied headers, and a bearer Authorization header when a
    /// token is held. On a 401 with a refresh token available, refreshes
    /// and retries exactly once with the rotated token; if the refresh
    /// fails the session is cleared and [`ApiError::SessionExpired`] is
    /// returned. Every other response - including a non-2xx after the
    /// retry - is returned unmodified for the caller to inspect.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let url = self.request_url(&request.path);

        let access = self.access_token().await;
        let response = self.send(request, &url, access.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        if !self.is_authenticated().await {
            return Ok(response);
        }

        debug!(path = %request.path, "Got 401, refreshing access token");
        if !self.refresh_access_token().await {
            warn!(path = %request.path, "Refresh failed after 401, clearing session");
            self.logout().await;
            return Err(ApiError::SessionExpired);
        }

        let access = self.access_token().await;
        self.send(request, &url, access.as_deref()).await
    }

    async fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .await
            .credential
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    /// Swap in a new token pair (both tokens together) and persist it.
    /// Persistence failures are logged, not fatal: the in-memory session
    /// stays usable either way.
    async fn install_credential(&self, credential: Credential) {
        if let Err(e) = self.store.save(&credential) {
            warn!(error = %e, "Failed to persist tokens");
        }
        let mut state = self.state.write().await;
        state.credential = Some(credential);
        state.generation += 1;
    }

    /// Endpoint paths are normalized to carry a leading slash.
    fn request_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            self.config.endpoint_url(path)
        } else {
            self.config.endpoint_url(&format!("/{}", path))
        }
    }

    async fn send(
        &self,
        request: &ApiRequest,
        url: &str,
        access: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(header::CONTENT_TYPE, "application/json")
            .headers(request.headers.clone());

        // The bearer header goes last so it overrides anything the caller
        // put under Authorization.
        if let Some(token) = access {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }
}
