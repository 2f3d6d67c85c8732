//! News post model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published news post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub content: String,
    /// Creation time; display order is descending by this field
    pub date: DateTime<Utc>,
}

/// Request body for publishing a news post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNewsRequest {
    pub title: String,
    pub content: String,
}
