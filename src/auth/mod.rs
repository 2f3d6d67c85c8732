//! Admin session gate.
//!
//! Logging in with the configured admin password issues a short-lived
//! session token; every admin request must present it. Password comparison
//! is constant-time to mitigate timing attacks.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// Header name for the admin session token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// How long an issued session stays valid.
const SESSION_TTL_HOURS: i64 = 2;

/// In-memory store of live admin sessions (token -> expiry).
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh session token.
    pub async fn issue(&self) -> String {
        self.issue_with_ttl(Duration::hours(SESSION_TTL_HOURS)).await
    }

    async fn issue_with_ttl(&self, ttl: Duration) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token.clone(), Utc::now() + ttl);
        token
    }

    /// Check whether a token names a live session, pruning expired ones.
    pub async fn is_valid(&self, token: &str) -> bool {
        let now = Utc::now();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, expiry| *expiry > now);
        sessions.contains_key(token)
    }

    /// Revoke a session. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }
}

/// Admin authentication middleware.
///
/// When no admin password is configured the gate is disabled and all
/// requests pass (flagged at startup).
pub async fn admin_auth_layer(
    sessions: Arc<SessionStore>,
    gate_enabled: bool,
    request: Request,
    next: Next,
) -> Response {
    if !gate_enabled {
        return next.run(request).await;
    }

    match session_token(&request) {
        Some(token) => {
            if sessions.is_valid(&token).await {
                next.run(request).await
            } else {
                unauthorized_response("Invalid or expired admin session")
            }
        }
        None => unauthorized_response("Missing admin session token"),
    }
}

/// Pull the session token from the dedicated header, falling back to a
/// bearer token.
fn session_token(request: &Request) -> Option<String> {
    let header_token = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    header_token.or_else(|| {
        request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    })
}

/// Perform constant-time string comparison.
pub fn verify_password(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_password_equal() {
        assert!(verify_password("hunter2-but-longer", "hunter2-but-longer"));
    }

    #[test]
    fn test_verify_password_not_equal() {
        assert!(!verify_password("hunter2-but-longer", "hunter2-but-1onger"));
    }

    #[test]
    fn test_verify_password_different_lengths() {
        assert!(!verify_password("short", "much-longer-password"));
    }

    #[test]
    fn test_verify_password_empty() {
        assert!(verify_password("", ""));
        assert!(!verify_password("", "not-empty"));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new();

        let token = store.issue().await;
        assert!(store.is_valid(&token).await);
        assert!(!store.is_valid("some-other-token").await);

        assert!(store.revoke(&token).await);
        assert!(!store.is_valid(&token).await);
        assert!(!store.revoke(&token).await);
    }

    #[tokio::test]
    async fn test_expired_session_invalid() {
        let store = SessionStore::new();

        let token = store.issue_with_ttl(Duration::seconds(-1)).await;
        assert!(!store.is_valid(&token).await);
    }
}
