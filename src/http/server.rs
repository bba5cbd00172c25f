//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the proxy handler
//! - Wire up middleware (request ID, tracing, concurrency limit)
//! - Bind server to listener and shut down gracefully
//! - Dispatch requests to the rule table
//! - Forward matched requests upstream, fall back to the SPA otherwise
//!
//! # Request Flow
//! ```text
//! request
//!   → RuleTable::match_path
//!       ├─ Rule    → rewrite → headers → Forwarder → post_process
//!       └─ NoRoute → HistoryFallback (GET/HEAD) or 404
//!   → response
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::fallback::HistoryFallback;
use crate::http::forwarder::Forwarder;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::post_process;
use crate::observability::metrics::{self, NO_RULE};
use crate::routing::{RuleTable, RuleTableError};
use crate::security::headers::prepare_upstream_headers;

/// Errors that prevent the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid rule table: {0}")]
    Rules(#[from] RuleTableError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleTable>,
    pub forwarder: Forwarder,
    pub fallback: Option<Arc<HistoryFallback>>,
}

/// HTTP server for the reverse proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    rules: Arc<RuleTable>,
}

impl HttpServer {
    /// Compile the rule table and build the HTTP client for `config`.
    ///
    /// `config` is expected to have passed `validate_config`.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let rules = Arc::new(RuleTable::from_config(&config.rules)?);
        let forwarder = Forwarder::new(&config.timeouts)?;
        let fallback = HistoryFallback::from_config(&config.spa).map(Arc::new);

        if let Some(fallback) = &fallback {
            tracing::info!(root = %fallback.root().display(), "History fallback enabled");
        }

        let state = AppState {
            rules: rules.clone(),
            forwarder,
            fallback,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            rules,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(GlobalConcurrencyLimitLayer::new(
                        config.listener.max_concurrent_requests,
                    )),
            )
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.rules.len(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}

/// Main proxy handler.
/// Matches a rule, rewrites the path and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let rule = match state.rules.match_path(&path) {
        Ok(rule) => rule,
        Err(no_route) => {
            if let Some(fallback) = state.fallback.as_ref().filter(|f| f.handles(&request)) {
                let response = fallback.serve(request).await;
                metrics::record_request(method.as_str(), response.status().as_u16(), NO_RULE, start);
                return response;
            }

            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(method.as_str(), 404, NO_RULE, start);
            return ProxyError::from(no_route).into_response();
        }
    };

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let upstream_path = rule.upstream_path(path_and_query);
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        rule = %rule.prefix(),
        upstream = %rule.upstream_url(&upstream_path),
        "Proxying request"
    );

    let (mut parts, body) = request.into_parts();
    prepare_upstream_headers(&mut parts.headers, rule, peer);

    let result = state
        .forwarder
        .forward(parts.method, rule.target(), &upstream_path, parts.headers, body)
        .await;

    match result {
        Ok(response) => {
            let response = post_process(response, rule);
            metrics::record_request(method.as_str(), response.status().as_u16(), rule.prefix(), start);
            response
        }
        Err(e) => {
            let err = ProxyError::from_upstream(rule.origin(), &path, e);
            if let ProxyError::UpstreamUnavailable { timed_out, .. } = &err {
                metrics::record_upstream_error(rule.prefix(), *timed_out);
            }
            tracing::error!(request_id = %request_id, error = %err, "Upstream error");
            metrics::record_request(method.as_str(), err.status().as_u16(), rule.prefix(), start);
            err.into_response()
        }
    }
}
