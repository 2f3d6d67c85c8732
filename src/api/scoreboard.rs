//! Scoreboard API endpoints.

use axum::extract::{Multipart, Query, State};
use serde::{Deserialize, Serialize};

use super::{read_upload, success, ApiResult};
use crate::errors::AppError;
use crate::models::{ScoreboardRow, SortMetric};
use crate::store::sort_top;
use crate::AppState;

/// Query parameters for the top-N view; defaults mirror the public page.
#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub top: Option<usize>,
    #[serde(default)]
    pub ascending: Option<bool>,
}

/// Receipt for a replaced scoreboard table.
#[derive(Debug, Serialize)]
pub struct ScoreboardReceipt {
    pub rows: usize,
}

/// GET /api/scoreboard - The full table in file order.
pub async fn get_scoreboard(State(state): State<AppState>) -> ApiResult<Vec<ScoreboardRow>> {
    success(state.scoreboard.load().await?)
}

/// GET /api/scoreboard/top - The top N rows by a sort metric.
pub async fn get_scoreboard_top(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> ApiResult<Vec<ScoreboardRow>> {
    let metric = match query.metric.as_deref() {
        None => SortMetric::Economy,
        Some(raw) => SortMetric::from_str(raw).ok_or_else(|| {
            AppError::Validation(format!(
                "Unrecognized sort metric {:?}; expected one of economy, wins, gym_wins",
                raw
            ))
        })?,
    };
    let top = query.top.unwrap_or(10);
    let ascending = query.ascending.unwrap_or(false);

    let rows = state.scoreboard.load().await?;
    success(sort_top(rows, metric, top, ascending))
}

/// PUT /api/admin/scoreboard - Replace the scoreboard table.
pub async fn upload_scoreboard(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<ScoreboardReceipt> {
    let (_, bytes) = read_upload(&mut multipart).await?;
    let rows = state.scoreboard.replace(bytes).await?;
    success(ScoreboardReceipt { rows })
}
