use audisto_async::config::{ENV_API_KEY, ENV_PASSWORD};
use audisto_async::test_support::EnvGuard;
use audisto_async::types::CrawlId;
use audisto_async::{AudistoConfig, AudistoError, Client};
use serial_test::serial;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
#[serial(env)]
async fn env_credentials_are_sent_as_basic_auth() {
    let _creds = EnvGuard::credentials(Some("env-key"), Some("env-pw"));
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.0/crawls/3"))
        .and(basic_auth("env-key", "env-pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(AudistoConfig::new().with_api_base(server.uri()));
    let summary = client.crawls().get(CrawlId::from(3)).await.unwrap();
    assert_eq!(summary.id, Some(3));
}

#[tokio::test]
#[serial(env)]
async fn missing_credentials_fail_before_any_request() {
    let _creds = EnvGuard::credentials(None, None);
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::with_config(AudistoConfig::new().with_api_base(server.uri()));
    let err = client.status().crawls().await.unwrap_err();
    assert!(matches!(err, AudistoError::Config(_)), "got {err:?}");
}

#[tokio::test]
#[serial(env)]
async fn half_configured_credentials_count_as_missing() {
    let _key = EnvGuard::set(ENV_API_KEY, "only-key");
    let _pw = EnvGuard::remove(ENV_PASSWORD);
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::with_config(AudistoConfig::new().with_api_base(server.uri()));
    let err = client.crawls().get(CrawlId::from(1)).await.unwrap_err();
    assert!(matches!(err, AudistoError::Config(_)), "got {err:?}");
}

#[tokio::test]
#[serial(env)]
async fn api_version_override_changes_path() {
    let _creds = EnvGuard::credentials(Some("k"), Some("p"));
    let _ver = EnvGuard::set("AUDISTO_API_VERSION", "2.1");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2.1/status/crawls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::with_config(AudistoConfig::new().with_api_base(server.uri()));
    let status = client.status().crawls().await.unwrap();
    assert!(status.parsed().unwrap().items.is_empty());
}
