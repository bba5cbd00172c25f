//! History-API fallback for the single-page app.
//!
//! Requests no proxy rule claims land here when a static root is configured.
//! Browser navigations (`GET`/`HEAD`, `Accept: text/html`, no file extension)
//! get the SPA entry document so that client-side routing can take over.
//! Everything else is looked up in the static root.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::header::ACCEPT;
use axum::http::{Method, Request, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::SpaConfig;

#[derive(Debug, Clone)]
pub struct HistoryFallback {
    root: PathBuf,
    index: PathBuf,
}

impl HistoryFallback {
    /// `None` when no static root is configured.
    pub fn from_config(config: &SpaConfig) -> Option<Self> {
        let root = config.root.clone()?;
        let index = root.join(&config.index);
        Some(Self { root, index })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Whether the fallback wants to answer `request` at all.
    pub fn handles(&self, request: &Request<Body>) -> bool {
        matches!(*request.method(), Method::GET | Method::HEAD)
    }

    /// Whether `request` is a client-side navigation that should get the index.
    pub fn is_navigation(&self, request: &Request<Body>) -> bool {
        if !self.handles(request) {
            return false;
        }

        let wants_html = request
            .headers()
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.contains("text/html") || v.contains("*/*"));

        let last_segment = request.uri().path().rsplit('/').next().unwrap_or("");
        wants_html && !last_segment.contains('.')
    }

    /// Answer `request` with the index document or a static file.
    pub async fn serve(&self, request: Request<Body>) -> Response<Body> {
        let navigation = self.is_navigation(&request);
        tracing::debug!(
            path = %request.uri().path(),
            navigation,
            "Serving from SPA root"
        );

        let result = if navigation {
            ServeFile::new(&self.index).oneshot(request).await
        } else {
            ServeDir::new(&self.root).oneshot(request).await
        };

        match result {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}
