//! Metrics endpoint integration tests.
//!
//! Drives real HTTP traffic through `TestDemoServer` and checks what
//! `/metrics` exposes.

use demo_test_utils::{metric_sample, ExpositionAssertions, TestDemoServer};
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

async fn scrape(server: &TestDemoServer) -> Result<String, anyhow::Error> {
    let response = reqwest::get(format!("{}/metrics", server.url())).await?;
    assert_eq!(response.status(), 200);
    Ok(response.text().await?)
}

#[tokio::test]
async fn test_metrics_content_type() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn().await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    assert_eq!(
        content_type,
        Some("text/plain; version=0.0.4; charset=utf-8")
    );

    Ok(())
}

#[tokio::test]
async fn test_metrics_exposes_all_families() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn().await?;

    reqwest::get(format!("{}/api/users", server.url())).await?;
    let body = scrape(&server).await?;

    assert!(body.contains("# TYPE http_request_duration_seconds histogram"));
    assert!(body.contains("# TYPE http_requests_total counter"));
    assert!(body.contains("# TYPE http_requests_in_flight gauge"));
    assert!(body.contains("le=\"0.015\""));
    assert!(body.contains("le=\"+Inf\""));

    Ok(())
}

#[tokio::test]
async fn test_user_ids_collapse_to_template() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn().await?;

    for id in 1..=5 {
        reqwest::get(format!("{}/api/users/{}", server.url(), id)).await?;
    }
    reqwest::get(format!("{}/api/users/12345", server.url())).await?;

    let body = scrape(&server).await?;
    body.assert_sample(
        "http_requests_total",
        &[
            ("method", "GET"),
            ("route", "/api/users/:id"),
            ("status_code", "200"),
        ],
        5.0,
    )
    .assert_sample(
        "http_requests_total",
        &[("route", "/api/users/:id"), ("status_code", "404")],
        1.0,
    )
    .assert_no_label_value("/api/users/3")
    .assert_no_label_value("/api/users/12345");

    Ok(())
}

#[tokio::test]
async fn test_unmatched_api_paths_are_normalized() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn().await?;

    reqwest::get(format!(
        "{}/api/orders/550e8400-e29b-41d4-a716-446655440000",
        server.url()
    ))
    .await?;
    reqwest::get(format!("{}/api/orders/77", server.url())).await?;

    let body = scrape(&server).await?;
    body.assert_sample(
        "http_requests_total",
        &[("route", "/api/orders/:id"), ("status_code", "404")],
        2.0,
    );
    assert!(!body.contains("550e8400"));

    Ok(())
}

#[tokio::test]
async fn test_scrape_counts_itself_in_flight() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn().await?;

    let body = scrape(&server).await?;
    body.assert_sample("http_requests_in_flight", &[], 1.0);

    // Once the first scrape completes it is counted as a request
    let body = scrape(&server).await?;
    body.assert_sample(
        "http_requests_total",
        &[("route", "/metrics"), ("status_code", "200")],
        1.0,
    );

    Ok(())
}

#[tokio::test]
async fn test_in_flight_tracks_concurrent_requests() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn_with_vars(HashMap::from([
        ("SLOW_MIN_DELAY_MS".to_string(), "800".to_string()),
        ("SLOW_MAX_DELAY_MS".to_string(), "900".to_string()),
    ]))
    .await?;

    let slow_url = format!("{}/api/slow", server.url());
    let slow_requests: Vec<_> = (0..2)
        .map(|_| tokio::spawn(reqwest::get(slow_url.clone())))
        .collect();

    tokio::time::sleep(Duration::from_millis(200)).await;
    let body = scrape(&server).await?;
    body.assert_sample("http_requests_in_flight", &[], 3.0);

    for request in slow_requests {
        assert_eq!(request.await??.status(), 200);
    }

    let body = scrape(&server).await?;
    body.assert_sample("http_requests_in_flight", &[], 1.0);

    Ok(())
}

#[tokio::test]
async fn test_slow_requests_land_in_high_buckets() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn_with_vars(HashMap::from([
        ("SLOW_MIN_DELAY_MS".to_string(), "120".to_string()),
        ("SLOW_MAX_DELAY_MS".to_string(), "150".to_string()),
    ]))
    .await?;

    reqwest::get(format!("{}/api/slow", server.url())).await?;

    let body = scrape(&server).await?;
    let bucket = |le: &'static str| {
        metric_sample(
            &body,
            "http_request_duration_seconds_bucket",
            &[("route", "/api/slow"), ("status_code", "200"), ("le", le)],
        )
    };

    assert_eq!(bucket("0.1"), Some(0.0));
    assert_eq!(bucket("+Inf"), Some(1.0));
    assert_eq!(
        metric_sample(
            &body,
            "http_request_duration_seconds_count",
            &[("route", "/api/slow"), ("status_code", "200")]
        ),
        Some(1.0)
    );

    Ok(())
}

/// Send a request with an arbitrary method token over a raw connection.
async fn send_raw(
    server: &TestDemoServer,
    method: &str,
    path: &str,
) -> Result<String, anyhow::Error> {
    let mut stream = TcpStream::connect(server.addr()).await?;
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

#[tokio::test]
async fn test_extension_methods_collapse_to_other() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn().await?;

    for method in ["XMETHOD0", "XMETHOD1", "XMETHOD2"] {
        let response = send_raw(&server, method, "/health").await?;
        assert!(
            response.starts_with("HTTP/1.1 405"),
            "unexpected response to {method}: {response}"
        );
    }

    let body = scrape(&server).await?;
    body.assert_sample(
        "http_requests_total",
        &[
            ("method", "OTHER"),
            ("route", "/health"),
            ("status_code", "405"),
        ],
        3.0,
    );
    assert!(!body.contains("XMETHOD"), "extension method leaked into labels");

    Ok(())
}

#[tokio::test]
#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
async fn test_scrape_includes_process_metrics() -> Result<(), anyhow::Error> {
    let server = TestDemoServer::spawn().await?;

    let body = scrape(&server).await?;
    assert!(body.contains("# TYPE process_resident_memory_bytes gauge"));
    assert!(metric_sample(&body, "process_start_time_seconds", &[]).is_some_and(|t| t > 0.0));

    Ok(())
}

