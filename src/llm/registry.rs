//! Provider key to adapter constructor. The table is fixed at compile time;
//! construction happens only when the client asks for a key.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::anthropic::AnthropicProvider;
use super::azure::AzureProvider;
use super::bedrock::BedrockProvider;
use super::catalog::ProviderKey;
use super::google::GoogleProvider;
use super::ollama::OllamaProvider;
use super::openai::{OpenAICompatProvider, VendorProfile};
use super::provider::ChatProvider;
use crate::config::ProviderConfig;
use crate::errors::UnillmError;

pub type ProviderFactory =
    fn(ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>>;

pub fn resolve(key: ProviderKey) -> ProviderFactory {
    match key {
        ProviderKey::Anthropic => create_anthropic,
        ProviderKey::Aws => create_bedrock,
        ProviderKey::Azure => create_azure,
        ProviderKey::Google => create_google,
        ProviderKey::Ollama => create_ollama,
        ProviderKey::OpenAI => create_openai,
        ProviderKey::Groq => create_groq,
        ProviderKey::Mistral => create_mistral,
        ProviderKey::Fireworks => create_fireworks,
        ProviderKey::Together => create_together,
        ProviderKey::Octo => create_octo,
        ProviderKey::Replicate => create_replicate,
    }
}

fn ready<P: ChatProvider + 'static>(
    result: Result<P, UnillmError>,
) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    futures::future::ready(result.map(|p| Arc::new(p) as Arc<dyn ChatProvider>)).boxed()
}

fn openai_family(
    key: ProviderKey,
    config: ProviderConfig,
) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    match VendorProfile::for_key(key) {
        Some(profile) => ready(OpenAICompatProvider::new(profile, &config)),
        None => ready::<OpenAICompatProvider>(Err(UnillmError::UnknownProvider {
            provider: key.to_string(),
            valid: ProviderKey::valid_keys(),
        })),
    }
}

fn create_anthropic(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    ready(AnthropicProvider::new(&config))
}

fn create_azure(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    ready(AzureProvider::new(&config))
}

fn create_ollama(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    ready(OllamaProvider::new(&config))
}

fn create_bedrock(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    async move {
        let provider = BedrockProvider::new(&config).await?;
        Ok(Arc::new(provider) as Arc<dyn ChatProvider>)
    }
    .boxed()
}

fn create_google(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    async move {
        let provider = GoogleProvider::new(&config).await?;
        Ok(Arc::new(provider) as Arc<dyn ChatProvider>)
    }
    .boxed()
}

fn create_openai(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    openai_family(ProviderKey::OpenAI, config)
}

fn create_groq(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    openai_family(ProviderKey::Groq, config)
}

fn create_mistral(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    openai_family(ProviderKey::Mistral, config)
}

fn create_fireworks(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    openai_family(ProviderKey::Fireworks, config)
}

fn create_together(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    openai_family(ProviderKey::Together, config)
}

fn create_octo(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    openai_family(ProviderKey::Octo, config)
}

fn create_replicate(config: ProviderConfig) -> BoxFuture<'static, Result<Arc<dyn ChatProvider>, UnillmError>> {
    openai_family(ProviderKey::Replicate, config)
}
