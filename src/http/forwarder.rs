//! Upstream forwarding.
//!
//! # Responsibilities
//! - Issue the outbound request against the resolved origin
//! - Stream request and response bodies without buffering
//! - Enforce connect and total request timeouts
//!
//! # Design Decisions
//! - One pooled client per process, shared by all requests
//! - No retries: a failed call surfaces as 502/504 to the caller
//! - Redirects are returned to the caller, never followed
//! - Cancellation is future drop: when the caller disconnects the handler
//!   future is dropped and the in-flight upstream call with it
//! - `request_secs` bounds the whole exchange, body included. Past the
//!   deadline before headers arrive the caller gets 504; past it while the
//!   body streams, the response is cut short under the upstream's status
//!   and only the stream error is seen

use std::time::Duration;

use axum::body::{Body, HttpBody};
use axum::http::{HeaderMap, Method, Response};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use crate::config::TimeoutConfig;
use crate::routing::rule::join_upstream;
use crate::security::headers::strip_hop_by_hop;

/// Forwards requests to upstream origins.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .redirect(Policy::none())
            // Upstreams are contacted directly, never through an environment proxy.
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }

    /// Send `method upstream_path` to `origin` with already prepared headers.
    pub async fn forward(
        &self,
        method: Method,
        origin: &Url,
        upstream_path: &str,
        headers: HeaderMap,
        body: Body,
    ) -> Result<Response<Body>, reqwest::Error> {
        let url = join_upstream(origin, upstream_path);
        let mut request = self.client.request(method, &url).headers(headers);

        // A wrapped empty stream would go out chunked; send nothing instead.
        if body.size_hint().exact() != Some(0) {
            request = request.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let upstream = request.send().await?;
        tracing::trace!(url = %url, status = %upstream.status(), "Upstream responded");

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}
