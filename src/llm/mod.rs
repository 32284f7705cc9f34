pub mod provider;
pub mod anthropic;
pub mod azure;
pub mod bedrock;
pub mod google;
pub mod ollama;
pub mod openai;
pub mod http;
pub mod registry;
pub mod client;
pub mod model_id;
pub mod types;
pub mod catalog;

pub use catalog::{ProviderInfo, ProviderKey};
pub use client::{Client, ClientBuilder};
pub use model_id::ModelId;
pub use provider::ChatProvider;
pub use registry::ProviderFactory;
pub use types::{ChatCompletionResponse, ChatOptions, Choice, ChoiceMessage, Message, Role};
