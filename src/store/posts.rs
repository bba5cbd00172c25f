//! Community post capability.
//!
//! One trait, two backends: a local slot store (newest first, last write
//! wins) and the trading API over REST. The backend is picked at startup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{PostStoreConfig, PostStoreMode};
use crate::store::local::LocalPostStore;
use crate::store::remote::RemotePostStore;
use crate::store::slot::{SlotError, SlotStore};

#[derive(Debug, Error)]
pub enum PostStoreError {
    #[error("invalid request: {0}")]
    Validation(&'static str),

    #[error(transparent)]
    Storage(#[from] SlotError),

    #[error("post store HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote post store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("corrupt post data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0} is not supported by this post store")]
    Unsupported(&'static str),

    #[error("invalid post store configuration: {0}")]
    Config(String),
}

/// A published community post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_code: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    /// Feeds written by the browser app name this `timestamp`.
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A post to publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub user_id: String,
    pub user_name: String,
    pub user_code: String,
    pub content: String,
    pub image: String,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), PostStoreError> {
        if self.content.trim().is_empty() && self.image.trim().is_empty() {
            return Err(PostStoreError::Validation("content or image is required"));
        }
        Ok(())
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub post_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A comment to publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), PostStoreError> {
        if self.content.trim().is_empty() {
            return Err(PostStoreError::Validation("content is required"));
        }
        Ok(())
    }
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, PostStoreError>;

    async fn save(&self, post: NewPost) -> Result<Post, PostStoreError>;

    /// Delete by id. Unknown ids are not an error.
    async fn delete(&self, id: &str) -> Result<(), PostStoreError>;

    /// Increment likes, returning the new count (0 for an unknown post).
    async fn like(&self, id: &str) -> Result<u64, PostStoreError>;

    /// Comments on a post, oldest first.
    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, PostStoreError>;

    async fn comment(&self, comment: NewComment) -> Result<Comment, PostStoreError>;
}

/// Open the configured post backend.
pub fn open(
    config: &PostStoreConfig,
    slots: Arc<dyn SlotStore>,
) -> Result<Box<dyn PostStore>, PostStoreError> {
    match config.mode {
        PostStoreMode::Local => Ok(Box::new(LocalPostStore::new(slots))),
        PostStoreMode::Remote => {
            let base_url = config
                .base_url
                .as_deref()
                .ok_or_else(|| PostStoreError::Config("posts.base_url is required".into()))?;
            Ok(Box::new(RemotePostStore::new(base_url)?))
        }
    }
}

/// Render "N <unit> ago" the way the community feed shows timestamps.
pub fn format_relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const UNITS: [(f64, &str); 5] = [
        (31_536_000.0, "years"),
        (2_592_000.0, "months"),
        (86_400.0, "days"),
        (3_600.0, "hours"),
        (60.0, "minutes"),
    ];

    let seconds = (now - created_at).num_seconds().max(0) as f64;
    for (unit_secs, unit) in UNITS {
        let interval = seconds / unit_secs;
        if interval > 1.0 {
            return format!("{} {} ago", interval.floor(), unit);
        }
    }
    format!("{} seconds ago", seconds.floor())
}

/// Ids are strings locally and integers on the trading API.
mod flexible_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Text(s) => s,
        })
    }
}
