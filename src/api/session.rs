//! Admin session endpoints: login, logout, test mail.

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::{self, ADMIN_TOKEN_HEADER};
use crate::errors::AppError;
use crate::relay::RelayOutcome;
use crate::AppState;

/// Request body for the admin login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Issued admin session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReceipt {
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

/// Request body for the admin test mail.
#[derive(Debug, Deserialize)]
pub struct TestMailRequest {
    pub subject: String,
    pub body: String,
}

/// POST /api/admin/login - Exchange the admin password for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<SessionReceipt> {
    let Some(expected) = state.config.admin_password.as_deref() else {
        return Err(AppError::Validation(
            "Admin gate is disabled: no admin password configured".to_string(),
        ));
    };

    if !auth::verify_password(&request.password, expected) {
        return Err(AppError::Unauthorized(
            "Invalid admin password".to_string(),
        ));
    }

    let token = state.sessions.issue().await;
    success(SessionReceipt {
        token,
        issued_at: Utc::now(),
    })
}

/// POST /api/admin/logout - Revoke the presented session token.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    if let Some(token) = headers.get(ADMIN_TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        state.sessions.revoke(token).await;
    }
    success(())
}

/// POST /api/admin/test-mail - Fire the relay with an arbitrary message.
///
/// Unlike the suggestion path, failures here surface as errors so the admin
/// can see exactly what the transport reported.
pub async fn send_test_mail(
    State(state): State<AppState>,
    Json(request): Json<TestMailRequest>,
) -> ApiResult<RelayOutcome> {
    match state.mailer.notify(&request.subject, &request.body).await {
        RelayOutcome::Sent => success(RelayOutcome::Sent),
        RelayOutcome::NotConfigured => Err(AppError::Relay(
            "Mail relay is not configured".to_string(),
        )),
        RelayOutcome::Failed { reason } => Err(AppError::Relay(reason)),
    }
}
