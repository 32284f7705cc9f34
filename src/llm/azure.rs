use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::http;
use super::openai::{build_body, normalize_response};
use super::provider::ChatProvider;
use super::types::{ChatCompletionResponse, ChatOptions, Message};
use crate::config::ProviderConfig;
use crate::errors::UnillmError;

const PROVIDER: &str = "azure";
const DEFAULT_REGION: &str = "westus3";

/// Azure AI serverless deployments. The model name selects the deployment
/// host unless an explicit `base_url` is configured.
pub struct AzureProvider {
    client: Client,
    api_key: String,
    base_url: Option<String>,
    region: String,
}

impl AzureProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, UnillmError> {
        Ok(Self {
            client: http::build_client(PROVIDER, config)?,
            api_key: config.require(PROVIDER, "api_key", "AZURE_API_KEY")?,
            base_url: config.option("base_url").map(|u| u.trim_end_matches('/').to_string()),
            region: config.resolve("region", "AZURE_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/chat/completions", base),
            None => format!("https://{}.{}.models.ai.azure.com/v1/chat/completions", model, self.region),
        }
    }
}

#[async_trait]
impl ChatProvider for AzureProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError> {
        let mut options = options.clone();
        // Streaming is not supported here
        options.extra.remove("stream");
        let body = build_body(None, messages, &options);

        let request = self.client
            .post(self.endpoint(model))
            .header("Authorization", &self.api_key)
            .json(&body);
        let data = http::send_json(PROVIDER, request, &[self.api_key.as_str()]).await?;

        debug!(provider = PROVIDER, model = %model, "Chat completion");
        normalize_response(PROVIDER, &data)
    }

    fn provider_name(&self) -> &str { PROVIDER }
}
