//! Transport-neutral notification document and processed-event envelope.
//!
//! Processors build a [`NotificationDocument`]; the delivery layer decides how
//! to render it for a concrete chat platform.

use serde::{Deserialize, Serialize};

pub const TASK_NOTIFICATION_COLOR: u32 = 0x0035_7EDD;
pub const COMMENT_NOTIFICATION_COLOR: u32 = 0x002E_CC71;
pub const COMMAND_REPLY_COLOR: u32 = 0x0095_A5A6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `NotificationField` used across acord components.
pub struct NotificationField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `NotificationDocument` used across acord components.
pub struct NotificationDocument {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub fields: Vec<NotificationField>,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl NotificationDocument {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: None,
            fields: Vec::new(),
            color,
            timestamp: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_inline_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(NotificationField {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
        self
    }

    pub fn with_timestamp(mut self, timestamp: Option<String>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn field(&self, name: &str) -> Option<&NotificationField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `ProcessedEvent` used across acord components.
pub struct ProcessedEvent {
    pub project_id: u64,
    pub body: NotificationDocument,
}
