use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::{redact, ProviderConfig};
use crate::errors::UnillmError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client honoring the provider's `timeout` option (seconds).
pub fn build_client(provider: &str, config: &ProviderConfig) -> Result<Client, UnillmError> {
    let timeout = config.get_u64("timeout").unwrap_or(DEFAULT_TIMEOUT_SECS);
    Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()
        .map_err(|e| UnillmError::Config(format!("Failed to build {} HTTP client: {}", provider, e)))
}

/// `base_url` option with a trailing slash stripped, or `default`.
pub fn base_url(config: &ProviderConfig, env_var: Option<&str>, default: &str) -> String {
    let url = match env_var {
        Some(var) => config.resolve("base_url", var),
        None => config.option("base_url"),
    };
    url.unwrap_or_else(|| default.to_string()).trim_end_matches('/').to_string()
}

/// Send a JSON request and decode a JSON reply. Transport failures,
/// non-2xx statuses and undecodable bodies all become `ProviderRequest`.
/// `secrets` are masked out of any error message.
pub async fn send_json(provider: &str, request: RequestBuilder, secrets: &[&str]) -> Result<Value, UnillmError> {
    let resp = request.send().await.map_err(|e| {
        UnillmError::request(provider, e.status().map(|s| s.as_u16()), redact(&e.to_string(), secrets))
    })?;
    read_json(provider, resp, secrets).await
}

pub async fn read_json(provider: &str, resp: reqwest::Response, secrets: &[&str]) -> Result<Value, UnillmError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = redact(&error_message(&body), secrets);
        return Err(UnillmError::request(provider, Some(status.as_u16()), message));
    }

    resp.json::<Value>()
        .await
        .map_err(|e| UnillmError::request(provider, None, format!("Failed to parse response: {}", e)))
}

/// Pull `error.message` out of a vendor error body, else return the body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v["error"]["message"]
                .as_str()
                .or_else(|| v["error"].as_str())
                .or_else(|| v["message"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Read a string at a JSON pointer, or fail as a malformed response.
pub fn extract_text(provider: &str, data: &Value, pointer: &str) -> Result<String, UnillmError> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| UnillmError::malformed(provider, pointer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_from_openai_body() {
        let body = r#"{"error": {"message": "Incorrect API key", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key");
    }

    #[test]
    fn test_error_message_from_ollama_body() {
        assert_eq!(error_message(r#"{"error": "model 'x' not found"}"#), "model 'x' not found");
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_extract_text() {
        let data = json!({"choices": [{"message": {"content": "Hi"}}]});
        assert_eq!(extract_text("openai", &data, "/choices/0/message/content").unwrap(), "Hi");
        let err = extract_text("openai", &json!({"choices": []}), "/choices/0/message/content").unwrap_err();
        assert!(matches!(err, UnillmError::ProviderRequest { .. }));
    }

    #[test]
    fn test_base_url_trims_slash() {
        let config = ProviderConfig::new().with("base_url", "http://localhost:8080/v1/");
        assert_eq!(base_url(&config, None, "https://x"), "http://localhost:8080/v1");
        assert_eq!(base_url(&ProviderConfig::new(), None, "https://x"), "https://x");
    }

    #[test]
    fn test_base_url_expands_env_reference() {
        std::env::set_var("TEST_UNILLM_HTTP_BASE", "http://gateway.local/v1/");
        let config = ProviderConfig::new().with("base_url", "$TEST_UNILLM_HTTP_BASE");
        assert_eq!(base_url(&config, None, "https://x"), "http://gateway.local/v1");
        std::env::remove_var("TEST_UNILLM_HTTP_BASE");
    }

    #[tokio::test]
    async fn test_error_body_is_redacted() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided: sk-live-123456"}
            })))
            .mount(&server)
            .await;

        let request = Client::new().post(server.uri()).json(&json!({}));
        let err = send_json("openai", request, &["sk-live-123456"]).await.unwrap_err();
        match err {
            UnillmError::ProviderRequest { status, message, .. } => {
                assert_eq!(status, Some(401));
                assert!(!message.contains("sk-live-123456"));
                assert!(message.contains("[REDACTED]"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
