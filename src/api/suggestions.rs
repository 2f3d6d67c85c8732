//! Suggestion API endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use super::{success, ApiResult};
use crate::models::{CreateSuggestionRequest, Suggestion};
use crate::relay::RelayOutcome;
use crate::AppState;

/// Stored suggestion plus the outcome of the notification relay.
#[derive(Debug, Serialize)]
pub struct SuggestionReceipt {
    pub suggestion: Suggestion,
    pub relay: RelayOutcome,
}

/// POST /api/suggestions - Submit a suggestion.
///
/// The relay fires after the write and its failure never undoes it; the
/// outcome rides along in the receipt so the caller can surface a warning.
pub async fn submit_suggestion(
    State(state): State<AppState>,
    Json(request): Json<CreateSuggestionRequest>,
) -> ApiResult<SuggestionReceipt> {
    let name = request.display_name();
    let suggestion = state
        .content
        .add_suggestion(name, &request.content)
        .await?;

    let subject = format!("Suggestion - {}", suggestion.name);
    let body = format!(
        "Suggestion: {}\n\nSubmitted at: {}",
        suggestion.content,
        suggestion.date.to_rfc3339()
    );
    let relay = state.mailer.notify(&subject, &body).await;

    success(SuggestionReceipt { suggestion, relay })
}

/// GET /api/admin/suggestions - List suggestions, most recent first.
pub async fn list_suggestions(State(state): State<AppState>) -> ApiResult<Vec<Suggestion>> {
    let mut suggestions = state.content.list_suggestions().await;
    suggestions.reverse();
    success(suggestions)
}
