use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::http;
use super::provider::ChatProvider;
use super::types::{insert_nested, ChatCompletionResponse, ChatOptions, Message};
use crate::config::ProviderConfig;
use crate::errors::UnillmError;

const PROVIDER: &str = "ollama";
pub const OLLAMA_NOT_RUNNING: &str =
    "Ollama is likely not running. Start Ollama by running `ollama serve` on your host.";

/// Locally hosted Ollama server. No credentials.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, UnillmError> {
        Ok(Self {
            client: http::build_client(PROVIDER, config)?,
            base_url: http::base_url(config, Some("OLLAMA_API_URL"), "http://localhost:11434"),
        })
    }
}

/// `{model, messages, stream: false, options: {temperature}, ...extra}`
pub(crate) fn build_body(model: &str, messages: &[Message], options: &ChatOptions) -> Value {
    let mut body = Map::new();
    body.insert("model".into(), json!(model));
    body.insert("messages".into(), json!(messages));
    body.insert("stream".into(), json!(false));
    options.apply_extra(&mut body, &["model", "messages", "stream"]);
    if let Some(t) = options.temperature {
        insert_nested(&mut body, "options", "temperature", json!(t));
    }
    Value::Object(body)
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError> {
        let body = build_body(model, messages, options);

        let resp = self.client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    UnillmError::LocalServiceUnavailable {
                        provider: PROVIDER.to_string(),
                        message: OLLAMA_NOT_RUNNING.to_string(),
                    }
                } else {
                    UnillmError::request(PROVIDER, e.status().map(|s| s.as_u16()), e.to_string())
                }
            })?;
        let data = http::read_json(PROVIDER, resp, &[]).await?;

        let content = http::extract_text(PROVIDER, &data, "/message/content")?;

        debug!(model = %model, "Ollama completion");
        Ok(ChatCompletionResponse::from_text(content))
    }

    fn provider_name(&self) -> &str { PROVIDER }
}
