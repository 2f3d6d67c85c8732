//! Player suggestion model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder name stored when the submitter asks to stay anonymous.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Placeholder name stored when the submitter leaves the name blank.
pub const UNNAMED_NAME: &str = "Unnamed";

/// A player suggestion. Append-only; never edited or deleted through the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub content: String,
    pub date: DateTime<Utc>,
}

/// Request body for submitting a suggestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSuggestionRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub content: String,
    /// Overrides `name` with the anonymous placeholder when set
    #[serde(default)]
    pub anonymous: bool,
}

impl CreateSuggestionRequest {
    /// Resolve the name to store, applying the anonymous/blank placeholders.
    pub fn display_name(&self) -> String {
        if self.anonymous {
            return ANONYMOUS_NAME.to_string();
        }
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => UNNAMED_NAME.to_string(),
        }
    }
}
