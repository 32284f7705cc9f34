use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::http::{self, DEFAULT_TIMEOUT_SECS};
use super::provider::ChatProvider;
use super::types::{ChatCompletionResponse, ChatOptions, Message};
use crate::config::ProviderConfig;
use crate::errors::UnillmError;

const PROVIDER: &str = "aws";
const DEFAULT_REGION: &str = "us-west-2";

/// AWS Bedrock `InvokeModel` with Llama 3 instruction prompts.
pub struct BedrockProvider {
    client: BedrockClient,
}

impl BedrockProvider {
    pub async fn new(config: &ProviderConfig) -> Result<Self, UnillmError> {
        let access_key = config.require(PROVIDER, "aws_access_key", "AWS_ACCESS_KEY_ID")?;
        let secret_key = config.require(PROVIDER, "aws_secret_key", "AWS_SECRET_ACCESS_KEY")?;
        let session_token = config.resolve("aws_session_token", "AWS_SESSION_TOKEN");
        let region = config.resolve("aws_region", "AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let timeout = config.get_u64("timeout").unwrap_or(DEFAULT_TIMEOUT_SECS);

        let credentials = aws_credential_types::Credentials::new(
            access_key,
            secret_key,
            session_token,
            None,
            "unillm-config",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .credentials_provider(credentials)
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(timeout))
                    .build(),
            );
        if let Some(endpoint) = config.option("base_url") {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Ok(Self { client: BedrockClient::new(&sdk_config) })
    }
}

/// Render a conversation in the Llama 3 instruction format, ending with an
/// open assistant header.
pub fn llama3_prompt(messages: &[Message]) -> String {
    let mut prompt = String::from("<|begin_of_text|>");
    for message in messages {
        prompt.push_str(&format!(
            "<|start_header_id|>{}<|end_header_id|>{}<|eot_id|>\n",
            message.role.as_str(),
            message.content
        ));
    }
    prompt.push_str("<|start_header_id|>assistant<|end_header_id|>");
    prompt
}

pub(crate) fn build_body(messages: &[Message], options: &ChatOptions) -> Value {
    let mut body = Map::new();
    body.insert("prompt".into(), json!(llama3_prompt(messages)));
    options.apply_to(&mut body, &["prompt"]);
    Value::Object(body)
}

#[async_trait]
impl ChatProvider for BedrockProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError> {
        let body = serde_json::to_vec(&build_body(messages, options))?;

        let output = self.client
            .invoke_model()
            .model_id(model)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                UnillmError::request(PROVIDER, status, DisplayErrorContext(&e).to_string())
            })?;

        let data: Value = serde_json::from_slice(output.body().as_ref())
            .map_err(|e| UnillmError::request(PROVIDER, None, format!("Failed to parse response: {}", e)))?;
        let generation = http::extract_text(PROVIDER, &data, "/generation")?;

        debug!(model = %model, "Bedrock completion");
        Ok(ChatCompletionResponse::from_text(generation))
    }

    fn provider_name(&self) -> &str { PROVIDER }
}
