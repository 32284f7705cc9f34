//! One chat-completions client over many LLM vendors.
//!
//! Requests are addressed as `"provider:model"`; the client builds one
//! adapter per provider on first use and returns every vendor's answer in
//! the same `{choices: [{message: {content}}]}` shape.
//!
//! ```no_run
//! # async fn run() -> unillm::Result<()> {
//! use unillm::{ChatOptions, Client, Message};
//!
//! let client = Client::new();
//! let response = client
//!     .chat()
//!     .completions()
//!     .create(
//!         "openai:gpt-4o",
//!         &[Message::system("Respond in Pirate English."), Message::user("Tell me a joke")],
//!         &ChatOptions::new().temperature(0.75),
//!     )
//!     .await?;
//! println!("{}", response.content());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod errors;
pub mod llm;

pub use config::{load_config, ProviderConfig, ProviderConfigs, UnillmConfig};
pub use errors::{ErrorClassification, Result, UnillmError};
pub use llm::{
    ChatCompletionResponse, ChatOptions, ChatProvider, Client, ClientBuilder, Message, ModelId,
    ProviderKey, Role,
};
