//! REST API integration tests.
//!
//! The router is driven in-process with `oneshot`; audited pages are served
//! by a wiremock server on the loopback interface.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pagecarbon::{AuditConfig, Auditor};
use pagecarbon_server::report::Coefficients;
use pagecarbon_server::rest::{router, AppState};

// ─────────────────────── helpers ───────────────────────

fn app() -> Router {
    let config = AuditConfig {
        timeout: Duration::from_millis(500),
        ..AuditConfig::default()
    };
    let state = AppState {
        auditor: Auditor::new(config).unwrap(),
        coefficients: Coefficients::default(),
    };
    router(Arc::new(state))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_raw(body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/audit")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app(), req).await
}

async fn post_audit(body: Value) -> (StatusCode, Value) {
    post_raw(&body.to_string()).await
}

// ─────────────────────── tests ───────────────────────

#[tokio::test]
async fn health_reports_ok() {
    let req = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn missing_url_is_bad_request() {
    let (status, body) = post_audit(json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Provide a valid http(s) URL");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (status, body) = post_raw("{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Provide a valid http(s) URL");
}

#[tokio::test]
async fn non_http_url_is_bad_request() {
    let (status, body) = post_audit(json!({ "url": "ftp://example.com/file" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Provide a valid http(s) URL");
}

#[tokio::test]
async fn unfetchable_page_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (status, body) = post_audit(json!({ "url": format!("{}/missing", server.uri()) })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Failed to fetch URL");
}

#[tokio::test]
async fn audit_returns_report() {
    let server = MockServer::start().await;
    let html = r#"<html><head><link rel="stylesheet" href="/site.css"></head>
        <body><img src="/hero.jpg"><img src="/gone.png"><script src="/app.js"></script></body></html>"#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(&server)
        .await;
    for (p, size) in [("/site.css", 2_000usize), ("/hero.jpg", 400 * 1024), ("/app.js", 10_000)] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; size]))
            .mount(&server)
            .await;
    }

    let page_url = format!("{}/", server.uri());
    let (status, body) = post_audit(json!({ "url": page_url })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ok"], true);
    assert_eq!(body["url"], page_url.as_str());

    let types: Vec<&str> = body["assets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, ["css", "js", "img", "img"]);

    let expected_total = html.len() as u64 + 2_000 + 10_000 + 400 * 1024;
    assert_eq!(body["bytesTotal"], expected_total);
    assert_eq!(body["assets"][3]["bytes"], 0);
    assert_eq!(body["assets"][3]["measured"], false);
    assert_eq!(body["unmeasuredAssets"], 1);

    let c = Coefficients::default();
    let expected_co2 = (c.co2_grams(expected_total) * 1000.0).round() as u64;
    assert_eq!(body["co2PerKViews_g"], expected_co2);
    assert_eq!(body["assumptions"]["ENERGY_KWH_PER_GB"], 0.81);
    assert_eq!(body["tips"], json!(["Compress 1 large images (>300KB)."]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn audits_run_concurrently_on_spawned_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<script src="/a.js"></script>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a.js"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 100]))
        .mount(&server)
        .await;

    let page_url = format!("{}/", server.uri());
    let handles: Vec<_> = (0..3)
        .map(|_| {
            let body = json!({ "url": page_url });
            tokio::spawn(async move { post_audit(body).await })
        })
        .collect();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["assets"][0]["bytes"], 100);
    }
}
