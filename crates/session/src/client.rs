//! HTTP client for the auth contract.

use std::time::Duration;

use medvault_auth::Role;
use medvault_core::RequestId;
use serde::Deserialize;
use thiserror::Error;

use crate::error::{AuthError, AuthResult};
use crate::register::RegisterPayload;

/// User-facing fallback message when a login rejection carries no usable body.
pub const LOGIN_REJECTED_FALLBACK: &str = "Invalid credentials. Please try again.";

/// User-facing message for a login attempt that never reached the backend.
pub const LOGIN_NETWORK_MESSAGE: &str = "Network error. Please check your connection.";

/// User-facing fallback message when a registration rejection has no body.
pub const REGISTER_REJECTED_FALLBACK: &str = "Registration failed";

/// User-facing message for a registration attempt that never reached the backend.
pub const REGISTER_NETWORK_MESSAGE: &str = "Network error";

/// Internal message for a credential the backend no longer accepts.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session is no longer valid.";

/// Message for a success response whose body could not be understood.
pub const INVALID_RESPONSE_MESSAGE: &str = "Received an invalid response from the server.";

/// Configuration for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://localhost:5000`. A trailing slash is
    /// stripped so path joins stay predictable.
    pub base_url: String,

    /// Applied to every request; none of the auth endpoints should take
    /// longer than this.
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ClientBuildError(#[from] reqwest::Error);

/// User object as returned by the auth endpoints.
///
/// `/api/auth/validate` returns a superset of the login user object, and
/// role casing differs between the two paths; unknown fields are ignored
/// and the role is parsed case-insensitively downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub emergency_contact: Option<String>,
}

/// Success body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPayload,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    user: UserPayload,
}

/// Thin wrapper over the three-endpoint auth contract.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/auth/login`.
    ///
    /// The requested role is forwarded verbatim; the role that matters is
    /// the one in the response body.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> AuthResult<LoginResponse> {
        let request_id = RequestId::new();
        let url = format!("{}/api/auth/login", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "role": role,
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%request_id, error = %e, "login request did not complete");
                AuthError::network(LOGIN_NETWORK_MESSAGE)
            })?;

        if response.status().is_success() {
            response.json::<LoginResponse>().await.map_err(|e| {
                tracing::warn!(%request_id, error = %e, "login response body was not understood");
                AuthError::invalid(INVALID_RESPONSE_MESSAGE)
            })
        } else {
            let message = rejection_message(response, LOGIN_REJECTED_FALLBACK).await;
            tracing::info!(%request_id, %message, "login rejected");
            Err(AuthError::rejected(message))
        }
    }

    /// `POST /api/auth/register`.
    pub async fn register(&self, payload: &RegisterPayload) -> AuthResult<UserPayload> {
        let request_id = RequestId::new();
        let url = format!("{}/api/auth/register", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%request_id, error = %e, "register request did not complete");
                AuthError::network(REGISTER_NETWORK_MESSAGE)
            })?;

        if response.status().is_success() {
            response.json::<UserPayload>().await.map_err(|e| {
                tracing::warn!(%request_id, error = %e, "register response body was not understood");
                AuthError::invalid(INVALID_RESPONSE_MESSAGE)
            })
        } else {
            let message = rejection_message(response, REGISTER_REJECTED_FALLBACK).await;
            tracing::info!(%request_id, %message, "registration rejected");
            Err(AuthError::rejected(message))
        }
    }

    /// `GET /api/auth/validate` with the credential as a bearer token.
    ///
    /// Any non-success status means the credential is not to be trusted;
    /// the body is not consulted.
    pub async fn validate(&self, token: &str) -> AuthResult<UserPayload> {
        let request_id = RequestId::new();
        let url = format!("{}/api/auth/validate", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%request_id, error = %e, "validate request did not complete");
                AuthError::network(LOGIN_NETWORK_MESSAGE)
            })?;

        if !response.status().is_success() {
            return Err(AuthError::rejected(SESSION_EXPIRED_MESSAGE));
        }

        response
            .json::<ValidateResponse>()
            .await
            .map(|body| body.user)
            .map_err(|e| {
                tracing::warn!(%request_id, error = %e, "validate response body was not understood");
                AuthError::invalid(INVALID_RESPONSE_MESSAGE)
            })
    }
}

/// Extract a human-readable message from a rejection body.
///
/// The backend answers with `{"message": ...}` JSON on some paths and plain
/// text on others; this is the only place that sniffs bodies. A JSON body
/// without a `message` field falls back rather than leaking raw JSON into
/// the UI.
async fn rejection_message(response: reqwest::Response, fallback: &str) -> String {
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = ApiClient::new(ClientConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn user_payload_accepts_superset_bodies() {
        // The validate path returns the full backend user entity.
        let json = r#"{
            "id": 3,
            "name": "Asha Rao",
            "email": "asha@clinic.org",
            "role": "PATIENT",
            "password": "$2a$10$ignored",
            "bloodGroup": "O+",
            "enabled": true
        }"#;
        let user: UserPayload = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, "PATIENT");
        assert_eq!(user.blood_group.as_deref(), Some("O+"));
        assert_eq!(user.specialization, None);
    }
}
