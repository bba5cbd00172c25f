//! End-to-end proxy behaviour against mock upstreams.

use std::time::Duration;

use axum::http::StatusCode;
use dashboard_proxy::config::{ProxyConfig, RuleConfig, SpaConfig};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

mod common;

use common::{client, next_request, spawn_proxy, ConnectionEvent, MockResponse};

fn config(rules: Vec<RuleConfig>) -> ProxyConfig {
    ProxyConfig {
        rules,
        ..ProxyConfig::default()
    }
}

#[tokio::test]
async fn rewrites_path_and_presents_upstream_host() {
    let (backend, mut seen) = common::start_mock_backend(MockResponse::ok("gold")).await;
    let (proxy, shutdown) = spawn_proxy(config(vec![RuleConfig::new(
        "/goldprice",
        &format!("http://{}", backend),
    )
    .rewrite("^/goldprice", "/GoldPrice")]))
    .await;

    let res = client()
        .get(format!("http://{}/goldprice/x?d=1", proxy))
        .header("origin", format!("http://{}", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "gold");

    let request = next_request(&mut seen).await;
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/GoldPrice/x?d=1");
    assert_eq!(request.header("host"), Some(backend.to_string().as_str()));
    assert_eq!(request.header("origin"), Some(format!("http://{}", backend).as_str()));
    assert_eq!(request.header("x-forwarded-host"), Some(proxy.to_string().as_str()));
    assert_eq!(request.header("x-forwarded-for"), Some("127.0.0.1"));
    assert!(request.header("x-request-id").is_some());

    shutdown.trigger();
}

#[tokio::test]
async fn strips_prefix_when_rewriting_to_empty() {
    let (backend, mut seen) = common::start_mock_backend(MockResponse::ok("[]")).await;
    let (proxy, shutdown) = spawn_proxy(config(vec![RuleConfig::new(
        "/api",
        &format!("http://{}", backend),
    )
    .rewrite("^/api", "")]))
    .await;

    client()
        .get(format!("http://{}/api/tickers", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(next_request(&mut seen).await.target, "/tickers");

    client().get(format!("http://{}/api", proxy)).send().await.unwrap();
    assert_eq!(next_request(&mut seen).await.target, "/");

    shutdown.trigger();
}

#[tokio::test]
async fn preserve_host_forwards_caller_host() {
    let (backend, mut seen) = common::start_mock_backend(MockResponse::ok("spa")).await;
    let (proxy, shutdown) =
        spawn_proxy(config(vec![
            RuleConfig::new("/", &format!("http://{}", backend)).preserve_host()
        ]))
        .await;

    client().get(format!("http://{}/crypto", proxy)).send().await.unwrap();

    let request = next_request(&mut seen).await;
    assert_eq!(request.target, "/crypto");
    assert_eq!(request.header("host"), Some(proxy.to_string().as_str()));

    shutdown.trigger();
}

#[tokio::test]
async fn first_declared_rule_wins() {
    let (general, mut general_seen) = common::start_mock_backend(MockResponse::ok("general")).await;
    let (specific, _specific_seen) = common::start_mock_backend(MockResponse::ok("specific")).await;
    let (proxy, shutdown) = spawn_proxy(config(vec![
        RuleConfig::new("/api", &format!("http://{}", general)),
        RuleConfig::new("/api/tickers", &format!("http://{}", specific)),
    ]))
    .await;

    let body = client()
        .get(format!("http://{}/api/tickers", proxy))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "general");
    assert_eq!(next_request(&mut general_seen).await.target, "/api/tickers");

    shutdown.trigger();
}

#[tokio::test]
async fn configured_response_header_replaces_upstream_value() {
    let (backend, _seen) = common::start_mock_backend(
        MockResponse::ok("[]").header("Access-Control-Allow-Origin", "https://calendar.example"),
    )
    .await;
    let (proxy, shutdown) = spawn_proxy(config(vec![RuleConfig::new(
        "/calendar",
        &format!("http://{}", backend),
    )
    .response_header("Access-Control-Allow-Origin", "*")]))
    .await;

    let res = client()
        .get(format!("http://{}/calendar/events", proxy))
        .send()
        .await
        .unwrap();
    let values: Vec<_> = res
        .headers()
        .get_all("access-control-allow-origin")
        .iter()
        .collect();
    assert_eq!(values, vec!["*"]);

    shutdown.trigger();
}

#[tokio::test]
async fn forwards_body_and_upstream_status() {
    let (backend, mut seen) = common::start_mock_backend(MockResponse::ok("{\"id\":1}").status(201)).await;
    let (proxy, shutdown) = spawn_proxy(config(vec![RuleConfig::new(
        "/trading",
        &format!("http://{}", backend),
    )]))
    .await;

    let res = client()
        .post(format!("http://{}/trading/community/posts", proxy))
        .header("content-type", "application/json")
        .body("{\"content\":\"hi\"}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let request = next_request(&mut seen).await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.body, b"{\"content\":\"hi\"}");
    assert_eq!(request.header("content-type"), Some("application/json"));

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_redirects_reach_the_caller() {
    let (backend, _seen) = common::start_mock_backend(
        MockResponse::ok("").status(302).header("Location", "/elsewhere"),
    )
    .await;
    let (proxy, shutdown) = spawn_proxy(config(vec![RuleConfig::new(
        "/",
        &format!("http://{}", backend),
    )]))
    .await;

    let res = client().get(format!("http://{}/old", proxy)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers().get("location").unwrap(), "/elsewhere");

    shutdown.trigger();
}

#[tokio::test]
async fn caller_request_id_is_propagated() {
    let (backend, mut seen) = common::start_mock_backend(MockResponse::ok("ok")).await;
    let (proxy, shutdown) = spawn_proxy(config(vec![RuleConfig::new(
        "/",
        &format!("http://{}", backend),
    )]))
    .await;

    let res = client()
        .get(format!("http://{}/", proxy))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get("x-request-id").unwrap(), "req-42");
    assert_eq!(next_request(&mut seen).await.header("x-request-id"), Some("req-42"));

    shutdown.trigger();
}

#[tokio::test]
async fn refused_upstream_is_bad_gateway() {
    let dead = common::refused_addr().await;
    let (proxy, shutdown) = spawn_proxy(config(vec![RuleConfig::new(
        "/cg",
        &format!("http://{}", dead),
    )]))
    .await;

    let res = client().get(format!("http://{}/cg/ping", proxy)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    shutdown.trigger();
}

#[tokio::test]
async fn slow_upstream_is_gateway_timeout() {
    let silent = common::start_silent_backend().await;
    let mut config = config(vec![RuleConfig::new("/slow", &format!("http://{}", silent))]);
    config.timeouts.request_secs = 1;
    let (proxy, shutdown) = spawn_proxy(config).await;

    let started = std::time::Instant::now();
    let res = client().get(format!("http://{}/slow", proxy)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(5));

    shutdown.trigger();
}

#[tokio::test]
async fn caller_disconnect_closes_upstream_connection() {
    let (backend, mut events) = common::start_hanging_backend().await;
    let (proxy, shutdown) =
        spawn_proxy(config(vec![RuleConfig::new("/api", &format!("http://{}", backend))])).await;

    let mut caller = TcpStream::connect(proxy).await.unwrap();
    caller
        .write_all(b"GET /api/quotes HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let seen = tokio::time::timeout(Duration::from_secs(5), events.recv()).await.unwrap();
    assert_eq!(seen, Some(ConnectionEvent::Request));

    drop(caller);
    let seen = tokio::time::timeout(Duration::from_secs(5), events.recv()).await.unwrap();
    assert_eq!(seen, Some(ConnectionEvent::Closed));

    shutdown.trigger();
}

#[tokio::test]
async fn no_rule_and_no_spa_is_not_found() {
    let (backend, _seen) = common::start_mock_backend(MockResponse::ok("ok")).await;
    let (proxy, shutdown) = spawn_proxy(config(vec![RuleConfig::new(
        "/api",
        &format!("http://{}", backend),
    )]))
    .await;

    let res = client().get(format!("http://{}/unknown", proxy)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "No matching route found");

    shutdown.trigger();
}

#[tokio::test]
async fn unclaimed_navigation_gets_spa_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<div id=app></div>").unwrap();
    std::fs::write(dir.path().join("favicon.ico"), "icon").unwrap();

    let (backend, _seen) = common::start_mock_backend(MockResponse::ok("ok")).await;
    let mut config = config(vec![RuleConfig::new("/api", &format!("http://{}", backend))]);
    config.spa = SpaConfig {
        root: Some(dir.path().to_path_buf()),
        ..SpaConfig::default()
    };
    let (proxy, shutdown) = spawn_proxy(config).await;

    let res = client()
        .get(format!("http://{}/my-portfolio", proxy))
        .header("accept", "text/html")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<div id=app></div>");

    let res = client()
        .get(format!("http://{}/favicon.ico", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "icon");

    let res = client()
        .post(format!("http://{}/my-portfolio", proxy))
        .header("accept", "text/html")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}
