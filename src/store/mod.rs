//! Flat-file persistence layer.
//!
//! The filesystem is the source of truth for all application data: JSON
//! documents for news, suggestions and the chat link, a CSV table for the
//! scoreboard, and opaque binary trees for the downloadable assets. Each
//! store is constructed once at startup and injected into the handlers.

mod assets;
mod content;
mod scoreboard;

pub use assets::*;
pub use content::*;
pub use scoreboard::*;

use std::path::Path;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::ChatLink;

pub const NEWS_FILE: &str = "news.json";
pub const SUGGESTIONS_FILE: &str = "suggestions.json";
pub const CHAT_FILE: &str = "chat.json";
pub const SCOREBOARD_FILE: &str = "scoreboard.csv";
pub const RULES_FILE: &str = "rules.pdf";

/// Create the store directories and seed the JSON documents.
///
/// Existing files are left untouched, so restarting the server never loses
/// state.
pub async fn init(config: &Config) -> Result<(), AppError> {
    tokio::fs::create_dir_all(&config.data_dir).await?;
    tokio::fs::create_dir_all(&config.files_dir).await?;

    seed_file(&config.data_dir.join(NEWS_FILE), b"[]").await?;
    seed_file(&config.data_dir.join(SUGGESTIONS_FILE), b"[]").await?;

    let chat = serde_json::to_vec_pretty(&ChatLink {
        link: config.default_chat_link.clone(),
    })?;
    seed_file(&config.data_dir.join(CHAT_FILE), &chat).await?;

    Ok(())
}

async fn seed_file(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        tokio::fs::write(path, contents).await?;
    }
    Ok(())
}

/// Write a file via a temporary sibling and an atomic rename, so readers
/// never observe a half-written document.
pub(crate) async fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    tokio::fs::write(&tmp, bytes).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        tokio::fs::remove_file(&tmp).await.ok();
        return Err(e.into());
    }
    Ok(())
}
