use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::http;
use super::provider::ChatProvider;
use super::types::{insert_nested, ChatCompletionResponse, ChatOptions, Message, Role};
use crate::auth::GoogleTokenSource;
use crate::config::ProviderConfig;
use crate::errors::UnillmError;

const PROVIDER: &str = "google";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

/// One Gemini conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

/// Gemini on Vertex AI (`generateContent`).
pub struct GoogleProvider {
    client: Client,
    tokens: GoogleTokenSource,
    project_id: String,
    region: String,
    base_url: String,
}

impl GoogleProvider {
    pub async fn new(config: &ProviderConfig) -> Result<Self, UnillmError> {
        let client = http::build_client(PROVIDER, config)?;
        let tokens = GoogleTokenSource::from_config(config).await?;

        let region = config.require(PROVIDER, "region", "GOOGLE_REGION")?;
        let project_id = match config.resolve("project_id", "GOOGLE_PROJECT_ID") {
            Some(p) => p,
            None => tokens.project_id().map(str::to_string).ok_or_else(|| UnillmError::MissingCredential {
                provider: PROVIDER.to_string(),
                variable: "GOOGLE_PROJECT_ID".to_string(),
            })?,
        };
        let base_url = http::base_url(config, None, &format!("https://{}-aiplatform.googleapis.com", region));

        // Exchange now so bad credentials fail at construction.
        tokens.token(&client).await?;

        Ok(Self { client, tokens, project_id, region, base_url })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.base_url, self.project_id, self.region, model
        )
    }
}

/// Gemini has no system role and calls the assistant "model".
pub fn transform_roles(messages: &[Message]) -> Vec<Content> {
    messages
        .iter()
        .map(|m| Content {
            role: match m.role {
                Role::System | Role::User => "user",
                Role::Assistant => "model",
            },
            parts: vec![Part { text: m.content.clone() }],
        })
        .collect()
}

/// `contents` is the history followed by the prompt turn, so at least one
/// message is required.
pub(crate) fn build_body(messages: &[Message], options: &ChatOptions) -> Result<Value, UnillmError> {
    if messages.is_empty() {
        return Err(UnillmError::InvalidRequest("google requires at least one message".into()));
    }

    let mut body = Map::new();
    body.insert("contents".into(), json!(transform_roles(messages)));
    options.apply_extra(&mut body, &["contents"]);
    if let Some(t) = options.temperature {
        insert_nested(&mut body, "generationConfig", "temperature", json!(t));
    }
    Ok(Value::Object(body))
}

#[async_trait]
impl ChatProvider for GoogleProvider {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<ChatCompletionResponse, UnillmError> {
        let body = build_body(messages, options)?;
        let token = self.tokens.token(&self.client).await?;

        let request = self.client
            .post(self.endpoint(model))
            .bearer_auth(&token)
            .json(&body);
        let data = http::send_json(PROVIDER, request, &[token.as_str()]).await?;

        let content = http::extract_text(PROVIDER, &data, "/candidates/0/content/parts/0/text")?;

        debug!(model = %model, region = %self.region, "Vertex AI completion");
        Ok(ChatCompletionResponse::from_text(content))
    }

    fn provider_name(&self) -> &str { PROVIDER }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_roles() {
        let messages = vec![Message::system("S"), Message::user("U"), Message::assistant("A")];
        let contents = transform_roles(&messages);
        let roles: Vec<(&str, &str)> = contents
            .iter()
            .map(|c| (c.role, c.parts[0].text.as_str()))
            .collect();
        assert_eq!(roles, vec![("user", "S"), ("user", "U"), ("model", "A")]);
    }

    #[test]
    fn test_transform_roles_leaves_input_untouched() {
        let messages = vec![Message::system("S")];
        let _ = transform_roles(&messages);
        assert_eq!(messages[0].role, Role::System);
    }

    #[test]
    fn test_prompt_is_last_content() {
        let body = build_body(&[Message::system("S"), Message::user("U"), Message::user("last")], &ChatOptions::new()).unwrap();
        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["contents"][2], json!({"role": "user", "parts": [{"text": "last"}]}));
    }

    #[test]
    fn test_build_body_empty() {
        let err = build_body(&[], &ChatOptions::new()).unwrap_err();
        assert!(matches!(err, UnillmError::InvalidRequest(_)));
    }

    #[test]
    fn test_extra_options_keep_contents() {
        let opts = ChatOptions::new()
            .temperature(0.4)
            .option("contents", json!([]))
            .option("generationConfig", json!({"maxOutputTokens": 256}))
            .option("safetySettings", json!([]));
        let body = build_body(&[Message::user("U")], &opts).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "U");
        assert_eq!(body["generationConfig"], json!({"maxOutputTokens": 256, "temperature": 0.4}));
        assert_eq!(body["safetySettings"], json!([]));
    }

    #[test]
    fn test_build_body() {
        let body = build_body(&[Message::system("S"), Message::user("U")], &ChatOptions::new().temperature(0.3)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "S"}]},
                    {"role": "user", "parts": [{"text": "U"}]}
                ],
                "generationConfig": {"temperature": 0.3}
            })
        );
    }

    #[tokio::test]
    async fn test_new_requires_region() {
        let config = ProviderConfig::new()
            .with("access_token", "tok")
            .with("project_id", "proj");
        if std::env::var("GOOGLE_REGION").is_ok() {
            return;
        }
        let err = GoogleProvider::new(&config).await.err().unwrap();
        assert!(matches!(err, UnillmError::MissingCredential { ref variable, .. } if variable == "GOOGLE_REGION"));
    }

    #[tokio::test]
    async fn test_endpoint() {
        let config = ProviderConfig::new()
            .with("access_token", "tok")
            .with("project_id", "proj")
            .with("region", "us-central1");
        let provider = GoogleProvider::new(&config).await.unwrap();
        assert_eq!(
            provider.endpoint("gemini-1.5-pro"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/proj/locations/us-central1/publishers/google/models/gemini-1.5-pro:generateContent"
        );
    }
}
