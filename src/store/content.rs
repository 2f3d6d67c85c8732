//! Content store: news posts, suggestions and the chat-group link.
//!
//! Each JSON document is read-modify-written wholesale. Writes to the same
//! document are serialized behind a per-document mutex and land via atomic
//! rename; a corrupt or unreadable document is treated as an empty
//! collection rather than a hard failure.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use super::{write_bytes_atomic, CHAT_FILE, NEWS_FILE, SUGGESTIONS_FILE};
use crate::errors::AppError;
use crate::models::{ChatLink, NewsItem, Suggestion};

/// Repository for the JSON-backed content collections.
pub struct ContentStore {
    news_path: PathBuf,
    suggestions_path: PathBuf,
    chat_path: PathBuf,
    default_chat_link: String,
    news_lock: Mutex<()>,
    suggestions_lock: Mutex<()>,
    chat_lock: Mutex<()>,
}

impl ContentStore {
    pub fn new(data_dir: &Path, default_chat_link: String) -> Self {
        Self {
            news_path: data_dir.join(NEWS_FILE),
            suggestions_path: data_dir.join(SUGGESTIONS_FILE),
            chat_path: data_dir.join(CHAT_FILE),
            default_chat_link,
            news_lock: Mutex::new(()),
            suggestions_lock: Mutex::new(()),
            chat_lock: Mutex::new(()),
        }
    }

    /// List news posts, newest first. Never fails visibly.
    pub async fn list_news(&self) -> Vec<NewsItem> {
        let mut items: Vec<NewsItem> = read_collection(&self.news_path).await;
        items.sort_by(|a, b| b.date.cmp(&a.date));
        items
    }

    /// Publish a news post, stamping the current time.
    pub async fn add_news(&self, title: String, content: String) -> Result<NewsItem, AppError> {
        let _guard = self.news_lock.lock().await;

        let mut items: Vec<NewsItem> = read_collection(&self.news_path).await;
        let item = NewsItem {
            title,
            content,
            date: Utc::now(),
        };
        items.push(item.clone());
        write_json_atomic(&self.news_path, &items).await?;

        Ok(item)
    }

    /// List suggestions in storage (append) order.
    pub async fn list_suggestions(&self) -> Vec<Suggestion> {
        read_collection(&self.suggestions_path).await
    }

    /// Append a suggestion. Empty or whitespace-only content is rejected
    /// with no state change.
    pub async fn add_suggestion(
        &self,
        name: String,
        content: &str,
    ) -> Result<Suggestion, AppError> {
        if content.trim().is_empty() {
            return Err(AppError::Validation(
                "Suggestion content must not be empty".to_string(),
            ));
        }

        let _guard = self.suggestions_lock.lock().await;

        let mut items: Vec<Suggestion> = read_collection(&self.suggestions_path).await;
        let suggestion = Suggestion {
            name,
            content: content.to_string(),
            date: Utc::now(),
        };
        items.push(suggestion.clone());
        write_json_atomic(&self.suggestions_path, &items).await?;

        Ok(suggestion)
    }

    /// Read the chat-group link, falling back to the configured default.
    pub async fn chat_link(&self) -> ChatLink {
        match tokio::fs::read(&self.chat_path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(link) => link,
                Err(e) => {
                    tracing::warn!(
                        "Corrupt chat link document {:?}, using default: {}",
                        self.chat_path,
                        e
                    );
                    ChatLink {
                        link: self.default_chat_link.clone(),
                    }
                }
            },
            Err(_) => ChatLink {
                link: self.default_chat_link.clone(),
            },
        }
    }

    /// Replace the chat-group link.
    pub async fn set_chat_link(&self, link: String) -> Result<ChatLink, AppError> {
        let _guard = self.chat_lock.lock().await;

        let chat = ChatLink { link };
        write_json_atomic(&self.chat_path, &chat).await?;
        Ok(chat)
    }
}

/// Read a JSON array document; a missing, unreadable or corrupt file is an
/// empty collection.
async fn read_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Unreadable collection {:?}, treating as empty: {}", path, e);
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Corrupt collection {:?}, treating as empty: {}", path, e);
            Vec::new()
        }
    }
}

async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_bytes_atomic(path, &bytes).await
}
