//! Discord message payload shaping.
//!
//! Caps follow Discord's documented embed limits; oversized values are cut on
//! a char boundary with a trailing ellipsis.

use acord_contract::NotificationDocument;
use serde_json::{json, Map, Value};

use crate::chat_platform::ChatMessage;

const DISCORD_CONTENT_MAX_CHARS: usize = 2000;
const EMBED_TITLE_MAX_CHARS: usize = 256;
const EMBED_DESCRIPTION_MAX_CHARS: usize = 4096;
const EMBED_FIELD_NAME_MAX_CHARS: usize = 256;
const EMBED_FIELD_VALUE_MAX_CHARS: usize = 1024;
const EMBED_MAX_FIELDS: usize = 25;

pub fn render_discord_message(message: &ChatMessage) -> Value {
    match message {
        ChatMessage::Text(text) => json!({
            "content": truncate_chars(text, DISCORD_CONTENT_MAX_CHARS),
            "allowed_mentions": { "parse": ["users"] },
        }),
        ChatMessage::Notification(document) => json!({
            "embeds": [render_discord_embed(document)],
            "allowed_mentions": { "parse": ["users"] },
        }),
    }
}

pub fn render_discord_embed(document: &NotificationDocument) -> Value {
    let mut embed = Map::new();
    embed.insert(
        "title".to_string(),
        Value::String(truncate_chars(&document.title, EMBED_TITLE_MAX_CHARS)),
    );
    if let Some(description) = document
        .description
        .as_deref()
        .filter(|value| !value.trim().is_empty())
    {
        embed.insert(
            "description".to_string(),
            Value::String(truncate_chars(description, EMBED_DESCRIPTION_MAX_CHARS)),
        );
    }
    if let Some(url) = document.url.as_deref() {
        embed.insert("url".to_string(), Value::String(url.to_string()));
    }
    embed.insert("color".to_string(), Value::from(document.color));
    if let Some(timestamp) = document.timestamp.as_deref() {
        embed.insert("timestamp".to_string(), Value::String(timestamp.to_string()));
    }
    let fields = document
        .fields
        .iter()
        .take(EMBED_MAX_FIELDS)
        .map(|field| {
            json!({
                "name": truncate_chars(&field.name, EMBED_FIELD_NAME_MAX_CHARS),
                "value": truncate_chars(
                    non_empty_field_value(&field.value),
                    EMBED_FIELD_VALUE_MAX_CHARS
                ),
                "inline": field.inline,
            })
        })
        .collect::<Vec<_>>();
    if !fields.is_empty() {
        embed.insert("fields".to_string(), Value::Array(fields));
    }
    Value::Object(embed)
}

// Discord rejects embeds with empty field values.
fn non_empty_field_value(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn truncate_chars(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_string();
    }
    let mut truncated = raw
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect::<String>();
    truncated.push_str("...");
    truncated
}
