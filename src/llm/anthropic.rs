use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::http;
use super::provider::ChatProvider;
use super::types::{ChatCompletionResponse, ChatOptions, Message, Role};
use crate::config::ProviderConfig;
use crate::errors::UnillmError;

const PROVIDER: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4096;

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, UnillmError> {
        Ok(Self {
            client: http::build_client(PROVIDER, config)?,
            api_key: config.require(PROVIDER, "api_key", "ANTHROPIC_API_KEY")?,
            base_url: http::base_url(config, None, "https://api.anthropic.com"),
        })
    }
}

/// Split out the system prompt and wrap the remaining turns as text blocks.
/// System messages after the first are appended to the system prompt.
pub fn convert_messages(messages: &[Message]) -> (Option<String>, Vec<Value>) {
    let mut system: Option<String> = None;
    let mut converted = Vec::with_capacity(messages.len());

    for msg in messages {
        match msg.role {
            Role::System => {
                system = Some(match system {
                    Some(existing) => format!("{}\n\n{}", existing, msg.content),
                    None => msg.content.clone(),
                });
            }
            Role::User | Role::Assistant => converted.push(json!({
                "role": msg.role.as_str(),
                "content": [{"type": "text", "text": msg.content}],
            })),
        }
    }

    (system, converted)
}

pub(crate) fn build_body(model: &str, messages: &[Message], options: &ChatOptions) -> Value {
    let (system, converted) = convert_messages(messages);

    let mut body = Map::new();
    body.insert("model".into(), json!(model));
    body.insert("messages".into(), Value::Array(converted));
    if let Some(sys) = system {
        body.insert("system".into(), json!(sys));
    }
    body.insert("max_tokens".into(), json!(DEFAULT_MAX_TOKENS));
    options.apply_to(&mut body, &["model", "messages", "system"]);
    Value::Object(body)
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError> {
        let body = build_body(model, messages, options);

        let request = self.client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body);
        let data = http::send_json(PROVIDER, request, &[self.api_key.as_str()]).await?;

        let content = http::extract_text(PROVIDER, &data, "/content/0/text")?;

        debug!(model = %model, "Anthropic completion");
        Ok(ChatCompletionResponse::from_text(content))
    }

    fn provider_name(&self) -> &str { PROVIDER }
}
