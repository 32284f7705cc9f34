use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Sampling temperature plus an opaque passthrough mapping. Nothing in
/// `extra` is interpreted by the router; adapters forward it to the vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(self, max_tokens: u32) -> Self {
        self.option("max_tokens", max_tokens)
    }

    pub fn option(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(name.to_string(), value.into());
        self
    }

    /// Copy temperature and passthrough options into a JSON request body.
    /// Passthrough options named in `reserved` are dropped.
    pub(crate) fn apply_to(&self, body: &mut Map<String, Value>, reserved: &[&str]) {
        if let Some(t) = self.temperature {
            body.insert("temperature".into(), Value::from(t));
        }
        self.apply_extra(body, reserved);
    }

    /// Copy passthrough options only. Keys in `reserved` carry routed values
    /// (model, messages, ...) and are never replaced.
    pub(crate) fn apply_extra(&self, body: &mut Map<String, Value>, reserved: &[&str]) {
        for (k, v) in &self.extra {
            if reserved.contains(&k.as_str()) {
                debug!(option = %k, "Ignoring passthrough option that names a routed field");
                continue;
            }
            body.insert(k.clone(), v.clone());
        }
    }
}

/// Set `body[outer][key] = value`, keeping other entries of an existing
/// `outer` object.
pub(crate) fn insert_nested(body: &mut Map<String, Value>, outer: &str, key: &str, value: Value) {
    let slot = body.entry(outer).or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(map) = slot {
        map.insert(key.to_string(), value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// The one response shape every adapter produces: a single choice holding
/// the generated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ChoiceMessage { content: content.into() },
            }],
        }
    }

    /// Text of the first choice.
    pub fn content(&self) -> &str {
        self.choices.first().map(|c| c.message.content.as_str()).unwrap_or("")
    }
}
