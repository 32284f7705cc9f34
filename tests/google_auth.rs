use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unillm::auth::{GoogleTokenSource, ServiceAccountCredentials};
use unillm::{ChatOptions, Client, Message, ProviderConfig, ProviderKey};

// Throwaway RSA key generated for these tests only.
const TEST_RSA_PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");

fn credentials(token_uri: String) -> ServiceAccountCredentials {
    ServiceAccountCredentials {
        client_email: "svc@test-project.iam.gserviceaccount.com".to_string(),
        private_key: TEST_RSA_PRIVATE_KEY.to_string(),
        token_uri: Some(token_uri),
        project_id: Some("test-project".to_string()),
    }
}

async fn token_endpoint(server: &MockServer, token: &str, expires_in: i64, hits: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": expires_in
        })))
        .expect(hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn service_account_token_is_fetched_once_and_cached() {
    let server = MockServer::start().await;
    token_endpoint(&server, "ya29.test-token", 3600, 1).await;

    let source = GoogleTokenSource::service_account(credentials(format!("{}/token", server.uri())));
    let http = reqwest::Client::new();

    assert_eq!(source.token(&http).await.unwrap(), "ya29.test-token");
    assert_eq!(source.token(&http).await.unwrap(), "ya29.test-token");
}

#[tokio::test]
async fn token_inside_refresh_window_is_exchanged_again() {
    let server = MockServer::start().await;
    // Expires in under five minutes, so every call refreshes.
    token_endpoint(&server, "ya29.short-lived", 120, 2).await;

    let source = GoogleTokenSource::service_account(credentials(format!("{}/token", server.uri())));
    let http = reqwest::Client::new();

    source.token(&http).await.unwrap();
    source.token(&http).await.unwrap();
}

#[tokio::test]
async fn token_endpoint_error_maps_to_provider_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let source = GoogleTokenSource::service_account(credentials(format!("{}/token", server.uri())));
    let err = source.token(&reqwest::Client::new()).await.unwrap_err();
    assert!(matches!(
        err,
        unillm::UnillmError::ProviderRequest { ref provider, status: Some(400), .. } if provider == "google"
    ));
}

#[tokio::test]
async fn configured_key_file_wins_over_env_token() {
    let server = MockServer::start().await;
    token_endpoint(&server, "ya29.from-key-file", 3600, 1).await;
    Mock::given(method("POST"))
        .and(path(
            "/v1/projects/test-project/locations/europe-west4/publishers/google/models/gemini-1.5-flash:generateContent",
        ))
        .and(header("authorization", "Bearer ya29.from-key-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "signed in"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key_file = serde_json::to_string(&json!({
        "type": "service_account",
        "project_id": "test-project",
        "client_email": "svc@test-project.iam.gserviceaccount.com",
        "private_key": TEST_RSA_PRIVATE_KEY,
        "token_uri": format!("{}/token", server.uri()),
    }))
    .unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(key_file.as_bytes()).unwrap();

    std::env::set_var("GCLOUD_ACCESS_TOKEN", "env-token");

    let config = ProviderConfig::new()
        .with("credentials_path", file.path().to_string_lossy().to_string())
        .with("region", "europe-west4")
        .with("base_url", server.uri());

    let source = GoogleTokenSource::from_config(&config).await.unwrap();
    assert!(matches!(source, GoogleTokenSource::ServiceAccount { .. }));
    assert_eq!(source.project_id(), Some("test-project"));

    let client = Client::builder().config(ProviderKey::Google, config).build().unwrap();
    let response = client
        .create("google:gemini-1.5-flash", &[Message::user("hello")], &ChatOptions::new())
        .await
        .unwrap();
    assert_eq!(response.content(), "signed in");

    std::env::remove_var("GCLOUD_ACCESS_TOKEN");
}
