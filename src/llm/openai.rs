use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::catalog::ProviderKey;
use super::http;
use super::provider::ChatProvider;
use super::types::{ChatCompletionResponse, ChatOptions, Message};
use crate::config::ProviderConfig;
use crate::errors::UnillmError;

/// Vendor speaking the OpenAI chat-completions dialect.
#[derive(Debug, Clone, Copy)]
pub struct VendorProfile {
    pub name: &'static str,
    pub base_url: &'static str,
    pub api_key_env: &'static str,
}

pub const OPENAI: VendorProfile =
    VendorProfile { name: "openai", base_url: "https://api.openai.com/v1", api_key_env: "OPENAI_API_KEY" };
pub const GROQ: VendorProfile =
    VendorProfile { name: "groq", base_url: "https://api.groq.com/openai/v1", api_key_env: "GROQ_API_KEY" };
pub const MISTRAL: VendorProfile =
    VendorProfile { name: "mistral", base_url: "https://api.mistral.ai/v1", api_key_env: "MISTRAL_API_KEY" };
pub const FIREWORKS: VendorProfile = VendorProfile {
    name: "fireworks",
    base_url: "https://api.fireworks.ai/inference/v1",
    api_key_env: "FIREWORKS_API_KEY",
};
pub const TOGETHER: VendorProfile =
    VendorProfile { name: "together", base_url: "https://api.together.xyz/v1", api_key_env: "TOGETHER_API_KEY" };
pub const OCTO: VendorProfile =
    VendorProfile { name: "octo", base_url: "https://text.octoai.run/v1", api_key_env: "OCTO_API_KEY" };
pub const REPLICATE: VendorProfile = VendorProfile {
    name: "replicate",
    base_url: "https://openai-proxy.replicate.com/v1",
    api_key_env: "REPLICATE_API_KEY",
};

impl VendorProfile {
    pub fn for_key(key: ProviderKey) -> Option<Self> {
        match key {
            ProviderKey::OpenAI => Some(OPENAI),
            ProviderKey::Groq => Some(GROQ),
            ProviderKey::Mistral => Some(MISTRAL),
            ProviderKey::Fireworks => Some(FIREWORKS),
            ProviderKey::Together => Some(TOGETHER),
            ProviderKey::Octo => Some(OCTO),
            ProviderKey::Replicate => Some(REPLICATE),
            _ => None,
        }
    }
}

pub struct OpenAICompatProvider {
    client: Client,
    profile: VendorProfile,
    api_key: String,
    base_url: String,
}

impl OpenAICompatProvider {
    pub fn new(profile: VendorProfile, config: &ProviderConfig) -> Result<Self, UnillmError> {
        let api_key = config.require(profile.name, "api_key", profile.api_key_env)?;
        Ok(Self {
            client: http::build_client(profile.name, config)?,
            profile,
            api_key,
            base_url: http::base_url(config, None, profile.base_url),
        })
    }
}

/// `{model, messages, temperature?, ...extra}`
pub(crate) fn build_body(model: Option<&str>, messages: &[Message], options: &ChatOptions) -> Value {
    let mut body = Map::new();
    if let Some(model) = model {
        body.insert("model".into(), json!(model));
    }
    body.insert("messages".into(), json!(messages));
    options.apply_to(&mut body, &["model", "messages"]);
    Value::Object(body)
}

pub(crate) fn normalize_response(provider: &str, data: &Value) -> Result<ChatCompletionResponse, UnillmError> {
    let content = http::extract_text(provider, data, "/choices/0/message/content")?;
    Ok(ChatCompletionResponse::from_text(content))
}

#[async_trait]
impl ChatProvider for OpenAICompatProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError> {
        let body = build_body(Some(model), messages, options);

        let request = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);
        let data = http::send_json(self.profile.name, request, &[self.api_key.as_str()]).await?;

        debug!(provider = self.profile.name, model = %model, "Chat completion");
        normalize_response(self.profile.name, &data)
    }

    fn provider_name(&self) -> &str { self.profile.name }
}
