use std::path::Path;

use serde_json::Value;
use tracing::debug;
use unillm::{load_config, ChatOptions, Client, Message, UnillmError};

use crate::cli::commands::ChatArgs;

pub async fn handle_chat(args: ChatArgs, config: Option<String>) -> Result<(), UnillmError> {
    let client = match config {
        Some(path) => {
            let config = load_config(Path::new(&path)).await?;
            debug!(path = %path, providers = config.providers.len(), "Loaded provider config");
            Client::with_configs(config.providers)?
        }
        None => Client::new(),
    };

    let messages = build_messages(&args);
    let options = build_options(&args)?;

    let response = client.chat().completions().create(&args.model, &messages, &options).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.content());
    }
    Ok(())
}

fn build_messages(args: &ChatArgs) -> Vec<Message> {
    let mut messages = Vec::with_capacity(args.messages.len() + 1);
    if let Some(system) = &args.system {
        messages.push(Message::system(system.as_str()));
    }
    messages.extend(args.messages.iter().map(|m| Message::user(m.as_str())));
    messages
}

fn build_options(args: &ChatArgs) -> Result<ChatOptions, UnillmError> {
    let mut options = ChatOptions::new();
    if let Some(t) = args.temperature {
        options = options.temperature(t);
    }
    if let Some(n) = args.max_tokens {
        options = options.max_tokens(n);
    }
    for raw in &args.options {
        let (name, value) = parse_option(raw)?;
        options = options.option(name, value);
    }
    Ok(options)
}

fn parse_option(raw: &str) -> Result<(&str, Value), UnillmError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| UnillmError::InvalidRequest(format!("Expected KEY=VALUE, got '{}'", raw)))?;
    if name.is_empty() {
        return Err(UnillmError::InvalidRequest(format!("Empty option name in '{}'", raw)));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(system: Option<&str>, options: &[&str]) -> ChatArgs {
        ChatArgs {
            model: "openai:gpt-4o".into(),
            system: system.map(String::from),
            temperature: Some(0.5),
            max_tokens: None,
            options: options.iter().map(|s| s.to_string()).collect(),
            json: false,
            messages: vec!["one".into(), "two".into()],
        }
    }

    #[test]
    fn test_system_message_goes_first() {
        let messages = build_messages(&args(Some("be brief"), &[]));
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::system("be brief"));
        assert_eq!(messages[2], Message::user("two"));
    }

    #[test]
    fn test_option_values_parse_as_json_or_string() {
        let options = build_options(&args(None, &["top_p=0.9", "stop=[\"\\n\"]", "user=alice"])).unwrap();
        assert_eq!(options.temperature, Some(0.5));
        assert_eq!(options.extra["top_p"], serde_json::json!(0.9));
        assert_eq!(options.extra["stop"], serde_json::json!(["\n"]));
        assert_eq!(options.extra["user"], serde_json::json!("alice"));
    }

    #[test]
    fn test_option_without_equals_is_rejected() {
        let err = build_options(&args(None, &["stream"])).unwrap_err();
        assert!(matches!(err, UnillmError::InvalidRequest(_)));
    }
}
