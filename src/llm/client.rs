use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::catalog::ProviderKey;
use super::model_id::ModelId;
use super::provider::ChatProvider;
use super::registry::{self, ProviderFactory};
use super::types::{ChatCompletionResponse, ChatOptions, Message};
use crate::config::{ProviderConfig, ProviderConfigs};
use crate::errors::UnillmError;

type ProviderSlot = Arc<OnceCell<Arc<dyn ChatProvider>>>;

/// Routes `"provider:model"` requests to lazily built, per-client adapters.
///
/// Each provider key gets at most one adapter per client, even when many
/// tasks hit the same key for the first time concurrently. `configure`
/// replaces the adapters of the keys it touches.
pub struct Client {
    configs: RwLock<HashMap<ProviderKey, ProviderConfig>>,
    factories: HashMap<ProviderKey, ProviderFactory>,
    providers: DashMap<ProviderKey, ProviderSlot>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
            factories: HashMap::new(),
            providers: DashMap::new(),
        }
    }

    pub fn with_configs(configs: ProviderConfigs) -> Result<Self, UnillmError> {
        Self::builder().configs(configs).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// `client.chat().completions().create(...)`
    pub fn chat(&self) -> Chat<'_> {
        Chat { client: self }
    }

    /// Merge provider options into the stored configuration. Adapters of the
    /// affected keys are dropped and rebuilt on next use. Unknown keys reject
    /// the whole update.
    pub fn configure(&self, configs: ProviderConfigs) -> Result<(), UnillmError> {
        let parsed = validate_keys(configs)?;

        let mut stored = self.configs.write().unwrap_or_else(|e| e.into_inner());
        for (key, config) in parsed {
            stored.entry(key).or_default().merge(config);
            if self.providers.remove(&key).is_some() {
                debug!(provider = %key, "Dropped cached adapter after reconfiguration");
            }
        }
        Ok(())
    }

    /// Snapshot of the stored options for `key`.
    pub fn config(&self, key: ProviderKey) -> ProviderConfig {
        self.configs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    /// Cached adapter for `key`, or build one now.
    pub async fn provider(&self, key: ProviderKey) -> Result<Arc<dyn ChatProvider>, UnillmError> {
        let slot = self.providers.entry(key).or_default().clone();

        let provider = slot
            .get_or_try_init(|| async {
                let factory = self.factories.get(&key).copied().unwrap_or_else(|| registry::resolve(key));
                let provider = factory(self.config(key)).await?;
                info!(provider = %key, "Initialized provider adapter");
                Ok::<_, UnillmError>(provider)
            })
            .await?;

        Ok(Arc::clone(provider))
    }

    /// Adapter for `key` if one has already been built.
    pub fn cached_provider(&self, key: ProviderKey) -> Option<Arc<dyn ChatProvider>> {
        self.providers.get(&key).and_then(|slot| slot.get().cloned())
    }

    /// Route one chat completion. `model` is `"provider:model"`; only the
    /// first colon separates, the rest goes to the vendor verbatim.
    pub async fn create(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError> {
        let id = ModelId::parse(model)?;
        let provider = self.provider(id.provider).await?;

        debug!(
            provider = %id.provider,
            model = %id.model,
            messages = messages.len(),
            "Routing chat completion"
        );
        provider.chat_completion(&id.model, messages, options).await
    }
}

fn validate_keys(configs: ProviderConfigs) -> Result<Vec<(ProviderKey, ProviderConfig)>, UnillmError> {
    configs
        .into_iter()
        .map(|(key, config)| Ok((key.parse::<ProviderKey>()?, config)))
        .collect()
}

#[derive(Default)]
pub struct ClientBuilder {
    configs: ProviderConfigs,
    factories: HashMap<ProviderKey, ProviderFactory>,
}

impl ClientBuilder {
    pub fn config(mut self, key: ProviderKey, config: ProviderConfig) -> Self {
        self.configs.entry(key.to_string()).or_default().merge(config);
        self
    }

    pub fn configs(mut self, configs: ProviderConfigs) -> Self {
        for (key, config) in configs {
            self.configs.entry(key).or_default().merge(config);
        }
        self
    }

    /// Replace the registered constructor for `key`.
    pub fn factory(mut self, key: ProviderKey, factory: ProviderFactory) -> Self {
        self.factories.insert(key, factory);
        self
    }

    pub fn build(self) -> Result<Client, UnillmError> {
        let configs = validate_keys(self.configs)?.into_iter().collect();
        Ok(Client {
            configs: RwLock::new(configs),
            factories: self.factories,
            providers: DashMap::new(),
        })
    }
}

pub struct Chat<'a> {
    client: &'a Client,
}

impl<'a> Chat<'a> {
    pub fn completions(&self) -> Completions<'a> {
        Completions { client: self.client }
    }
}

pub struct Completions<'a> {
    client: &'a Client,
}

impl Completions<'_> {
    pub async fn create(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError> {
        self.client.create(model, messages, options).await
    }
}
