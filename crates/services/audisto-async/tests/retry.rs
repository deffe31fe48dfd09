use std::time::{Duration, Instant};

use audisto_async::test_support::test_config;
use audisto_async::types::CrawlId;
use audisto_async::{AudistoError, Client};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn summary_body() -> serde_json::Value {
    serde_json::json!({"id": 1, "domain": "example.com", "crawled_pages": 10})
}

#[tokio::test]
async fn retry_503_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/crawls/1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2.0/crawls/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(test_config(server.uri()));
    let summary = client.crawls().get(CrawlId::from(1)).await.unwrap();

    assert_eq!(summary.crawled_pages, Some(10));
}

#[tokio::test]
async fn retry_waits_for_retry_after_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/crawls/1"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2.0/crawls/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(test_config(server.uri()));
    let started = Instant::now();
    let summary = client.crawls().get(CrawlId::from(1)).await.unwrap();

    assert_eq!(summary.crawled_pages, Some(10));
    assert!(
        started.elapsed() >= Duration::from_secs(1),
        "retried after {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn repeated_429_exhausts_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/crawls/1"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .expect(3)
        .mount(&server)
        .await;

    let client = Client::with_config(test_config(server.uri()).with_max_retries(2));
    let err = client.crawls().get(CrawlId::from(1)).await.unwrap_err();

    match &err {
        AudistoError::RetriesExhausted { attempts, last } => {
            assert_eq!(*attempts, 3);
            assert!(matches!(**last, AudistoError::Api(_)));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn zero_retries_still_reports_exhaustion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/status/crawls"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(test_config(server.uri()).with_max_retries(0));
    let err = client.status().crawls().await.unwrap_err();

    assert!(
        matches!(err, AudistoError::RetriesExhausted { attempts: 1, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/crawls/1"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(test_config(server.uri()));
    let err = client.crawls().get(CrawlId::from(1)).await.unwrap_err();

    assert!(matches!(err, AudistoError::Api(_)), "got {err:?}");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/crawls/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(summary_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = test_config(server.uri())
        .with_timeout(Duration::from_millis(200))
        .with_max_retries(0);
    let client = Client::with_config(config);
    let err = client.crawls().get(CrawlId::from(1)).await.unwrap_err();

    assert!(err.is_timeout(), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_connect_error() {
    // Port 9 (discard) on localhost is closed in test environments
    let client = Client::with_config(test_config("http://127.0.0.1:9").with_max_retries(0));
    let err = client.status().crawls().await.unwrap_err();

    assert!(err.is_connect(), "got {err:?}");
}
