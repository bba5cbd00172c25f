//! Request identification.
//!
//! # Responsibilities
//! - Assign an `x-request-id` to every inbound request that lacks one
//! - Forward it upstream and echo it on the response
//! - Expose it to handlers for log correlation
//!
//! # Design Decisions
//! - A caller-supplied id is kept, so chains of proxies share one id
//! - Ids are UUID v4, generated by tower-http

use axum::body::Body;
use axum::http::{HeaderName, Request};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that stamps a fresh id on requests without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// The id assigned to `request`, or `"unknown"` outside the layer stack.
pub fn request_id(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
        })
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_header_when_extension_missing() {
        let request = Request::get("/")
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&request), "abc-123");
    }

    #[test]
    fn prefers_extension() {
        let mut request = Request::get("/").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(RequestId::new(HeaderValue::from_static("from-layer")));
        assert_eq!(request_id(&request), "from-layer");
    }

    #[test]
    fn unknown_without_id() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        assert_eq!(request_id(&request), "unknown");
    }
}
