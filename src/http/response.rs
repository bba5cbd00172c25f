//! Response handling and transformation.
//!
//! # Responsibilities
//! - Apply a rule's static response headers to the upstream response
//! - Map proxy errors to the status and body seen by the caller
//!
//! # Design Decisions
//! - Configured headers overwrite whatever the upstream sent
//! - Status and body are never touched on the success path
//! - Error bodies are short fixed strings; details go to the log

use axum::body::Body;
use axum::http::Response;
use axum::response::IntoResponse;

use crate::error::ProxyError;
use crate::routing::Rule;

/// Overwrite the response headers configured on `rule`.
pub fn post_process(mut response: Response<Body>, rule: &Rule) -> Response<Body> {
    let headers = response.headers_mut();
    for (name, value) in rule.response_headers() {
        headers.insert(name.clone(), value.clone());
    }
    response
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        let message = match &self {
            ProxyError::NoRoute(_) => "No matching route found",
            ProxyError::UpstreamUnavailable { timed_out: true, .. } => "Upstream request timed out",
            ProxyError::UpstreamUnavailable { .. } => "Upstream request failed",
            ProxyError::InvalidRequest(_) => "Invalid upstream request",
        };
        (self.status(), message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::routing::NoRouteError;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn configured_header_overwrites_upstream_value() {
        let rule = Rule::from_config(
            &RuleConfig::new("/calendar", "https://calendar.example")
                .response_header("Access-Control-Allow-Origin", "*"),
        )
        .unwrap();

        let mut upstream = Response::new(Body::from("[]"));
        *upstream.status_mut() = StatusCode::CREATED;
        upstream.headers_mut().insert(
            "access-control-allow-origin",
            HeaderValue::from_static("https://calendar.example"),
        );
        upstream
            .headers_mut()
            .insert("content-type", HeaderValue::from_static("application/json"));

        let response = post_process(upstream, &rule);
        assert_eq!(response.status(), StatusCode::CREATED);
        let values: Vec<_> = response
            .headers()
            .get_all("access-control-allow-origin")
            .iter()
            .collect();
        assert_eq!(values, vec!["*"]);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn rule_without_headers_passes_through() {
        let rule = Rule::from_config(&RuleConfig::new("/cg", "https://api.coingecko.com")).unwrap();
        let mut upstream = Response::new(Body::empty());
        upstream.headers_mut().insert("x-upstream", HeaderValue::from_static("1"));

        let response = post_process(upstream, &rule);
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn errors_render_with_their_status() {
        let response = ProxyError::from(NoRouteError { path: "/x".into() }).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ProxyError::UpstreamUnavailable {
            origin: "http://127.0.0.1:1".into(),
            path: "/".into(),
            timed_out: true,
            reason: "deadline".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
