//! News API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::models::{CreateNewsRequest, NewsItem};
use crate::AppState;

/// GET /api/news - List news posts, newest first.
pub async fn list_news(State(state): State<AppState>) -> ApiResult<Vec<NewsItem>> {
    success(state.content.list_news().await)
}

/// POST /api/admin/news - Publish a news post.
pub async fn create_news(
    State(state): State<AppState>,
    Json(request): Json<CreateNewsRequest>,
) -> ApiResult<NewsItem> {
    let item = state
        .content
        .add_news(request.title, request.content)
        .await?;
    success(item)
}
