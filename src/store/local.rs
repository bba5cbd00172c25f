//! Posts kept in local slots.
//!
//! `community_posts` holds the whole feed as one JSON array, newest first;
//! `community_comments` holds every comment. Each operation is a
//! read-modify-write of one slot, so concurrent writers lose updates.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::store::posts::{Comment, NewComment, NewPost, Post, PostStore, PostStoreError};
use crate::store::slot::SlotStore;

pub const POSTS_KEY: &str = "community_posts";
pub const COMMENTS_KEY: &str = "community_comments";

pub struct LocalPostStore {
    slots: Arc<dyn SlotStore>,
}

impl LocalPostStore {
    pub fn new(slots: Arc<dyn SlotStore>) -> Self {
        Self { slots }
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, PostStoreError> {
        match self.slots.get(key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write<T: serde::Serialize>(&self, key: &str, items: &[T]) -> Result<(), PostStoreError> {
        self.slots.set(key, &serde_json::to_string(items)?)?;
        Ok(())
    }

    /// Epoch milliseconds, bumped past any id already taken.
    fn next_id(taken: impl Fn(&str) -> bool) -> String {
        let mut id = Utc::now().timestamp_millis();
        while taken(&id.to_string()) {
            id += 1;
        }
        id.to_string()
    }
}

#[async_trait]
impl PostStore for LocalPostStore {
    async fn list(&self) -> Result<Vec<Post>, PostStoreError> {
        self.read(POSTS_KEY)
    }

    async fn save(&self, post: NewPost) -> Result<Post, PostStoreError> {
        post.validate()?;
        let mut posts: Vec<Post> = self.read(POSTS_KEY)?;

        let created = Post {
            id: Self::next_id(|id| posts.iter().any(|p| p.id == id)),
            user_id: post.user_id,
            user_name: post.user_name,
            user_code: post.user_code,
            content: post.content,
            image: post.image,
            likes: 0,
            comments: 0,
            created_at: Utc::now(),
        };
        posts.insert(0, created.clone());
        self.write(POSTS_KEY, &posts)?;

        tracing::debug!(id = %created.id, total = posts.len(), "Post saved locally");
        Ok(created)
    }

    async fn delete(&self, id: &str) -> Result<(), PostStoreError> {
        let mut posts: Vec<Post> = self.read(POSTS_KEY)?;
        posts.retain(|p| p.id != id);
        self.write(POSTS_KEY, &posts)?;

        let mut comments: Vec<Comment> = self.read(COMMENTS_KEY)?;
        let before = comments.len();
        comments.retain(|c| c.post_id != id);
        if comments.len() != before {
            self.write(COMMENTS_KEY, &comments)?;
        }
        Ok(())
    }

    async fn like(&self, id: &str) -> Result<u64, PostStoreError> {
        let mut posts: Vec<Post> = self.read(POSTS_KEY)?;
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        post.likes += 1;
        let likes = post.likes;
        self.write(POSTS_KEY, &posts)?;
        Ok(likes)
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, PostStoreError> {
        let comments: Vec<Comment> = self.read(COMMENTS_KEY)?;
        Ok(comments.into_iter().filter(|c| c.post_id == post_id).collect())
    }

    async fn comment(&self, comment: NewComment) -> Result<Comment, PostStoreError> {
        comment.validate()?;
        let mut posts: Vec<Post> = self.read(POSTS_KEY)?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == comment.post_id)
            .ok_or(PostStoreError::Validation("post does not exist"))?;
        post.comments += 1;

        let mut comments: Vec<Comment> = self.read(COMMENTS_KEY)?;
        let created = Comment {
            id: Self::next_id(|id| comments.iter().any(|c| c.id == id)),
            post_id: comment.post_id,
            user_id: comment.user_id,
            user_name: comment.user_name,
            content: comment.content,
            created_at: Utc::now(),
        };
        comments.push(created.clone());

        self.write(COMMENTS_KEY, &comments)?;
        self.write(POSTS_KEY, &posts)?;
        Ok(created)
    }
}
