//! Posts served by the trading API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use crate::store::posts::{Comment, NewComment, NewPost, Post, PostStore, PostStoreError};

/// Comment body as the trading API expects it: integer post id.
#[derive(Serialize)]
struct CreateComment<'a> {
    post_id: i64,
    user_id: &'a str,
    user_name: &'a str,
    content: &'a str,
}

pub struct RemotePostStore {
    client: Client,
    base: String,
}

impl RemotePostStore {
    pub fn new(base_url: &str) -> Result<Self, PostStoreError> {
        Self::with_client(base_url, Client::builder().build()?)
    }

    /// Use a preconfigured client (proxy settings, timeouts).
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, PostStoreError> {
        let url = Url::parse(base_url)
            .map_err(|e| PostStoreError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        Ok(Self {
            client,
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn check(response: Response) -> Result<Response, PostStoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, message = %message.trim(), "Trading API rejected post request");
        Err(PostStoreError::Remote {
            status: status.as_u16(),
            message: message.trim().to_string(),
        })
    }
}

fn numeric_id(id: &str) -> Result<i64, PostStoreError> {
    id.parse()
        .map_err(|_| PostStoreError::Validation("remote post ids are integers"))
}

#[async_trait]
impl PostStore for RemotePostStore {
    async fn list(&self) -> Result<Vec<Post>, PostStoreError> {
        let response = self.client.get(self.url("/community/posts")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn save(&self, post: NewPost) -> Result<Post, PostStoreError> {
        post.validate()?;
        let response = self
            .client
            .post(self.url("/community/posts"))
            .json(&post)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), PostStoreError> {
        let id = numeric_id(id)?;
        let response = self
            .client
            .delete(self.url("/community/posts"))
            .query(&[("id", id)])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn like(&self, _id: &str) -> Result<u64, PostStoreError> {
        Err(PostStoreError::Unsupported("liking posts"))
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, PostStoreError> {
        let post_id = numeric_id(post_id)?;
        let response = self
            .client
            .get(self.url("/community/comments"))
            .query(&[("post_id", post_id)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn comment(&self, comment: NewComment) -> Result<Comment, PostStoreError> {
        comment.validate()?;
        let body = CreateComment {
            post_id: numeric_id(&comment.post_id)?,
            user_id: &comment.user_id,
            user_name: &comment.user_name,
            content: &comment.content,
        };
        let response = self
            .client
            .post(self.url("/community/comments"))
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
