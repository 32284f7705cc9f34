use serde_json::{json, Value};
use std::sync::LazyLock;

use crate::llm::catalog::ProviderKey;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    let keys: Vec<&str> = ProviderKey::ALL.iter().map(|k| k.as_str()).collect();
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "providers": {
                "type": "object",
                "propertyNames": { "enum": keys },
                "additionalProperties": { "$ref": "#/definitions/provider" }
            }
        },
        "definitions": {
            "provider": {
                "type": "object",
                "properties": {
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string" },
                    "timeout": { "type": ["integer", "string"] },
                    "region": { "type": "string" },
                    "project_id": { "type": "string" },
                    "access_token": { "type": "string" },
                    "credentials_path": { "type": "string" },
                    "aws_access_key": { "type": "string" },
                    "aws_secret_key": { "type": "string" },
                    "aws_session_token": { "type": "string" },
                    "aws_region": { "type": "string" }
                },
                "additionalProperties": { "type": ["string", "number", "boolean"] }
            }
        }
    })
});
