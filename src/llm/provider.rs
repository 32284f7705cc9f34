use async_trait::async_trait;

use super::types::{ChatCompletionResponse, ChatOptions, Message};
use crate::errors::UnillmError;

/// One vendor integration: translate the request, call the vendor, and
/// normalize the reply into [`ChatCompletionResponse`].
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Single chat completion. `model` is the vendor's own model name.
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
