use acord_contract::NotificationDocument;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `ChatGuild` used across acord components.
pub struct ChatGuild {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `ChatChannel` used across acord components.
pub struct ChatChannel {
    pub id: String,
    pub name: String,
    pub guild_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `ChatUser` used across acord components.
pub struct ChatUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
}

impl ChatUser {
    /// Discord mention markup, rendered as a ping in messages and embeds.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `ChatMessage` values.
pub enum ChatMessage {
    Text(String),
    Notification(NotificationDocument),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `ChatMessageReceipt` used across acord components.
pub struct ChatMessageReceipt {
    pub channel_id: String,
    pub message_id: String,
}

#[derive(Debug, Error)]
/// Enumerates supported `ChatPlatformError` values.
pub enum ChatPlatformError {
    #[error("invalid chat platform configuration: {0}")]
    InvalidConfig(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("discord api {endpoint} returned status {status}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid response from {endpoint}: {detail}")]
    InvalidResponse { endpoint: String, detail: String },
}

#[async_trait]
/// Trait contract for `ChatPlatform` behavior.
pub trait ChatPlatform: Send + Sync {
    /// Guilds visible to the bot, in a stable order; mapping rows address
    /// guilds by their position in this list.
    async fn guilds(&self) -> Result<Vec<ChatGuild>, ChatPlatformError>;

    /// Live text channels of one guild.
    async fn guild_channels(&self, guild_id: &str) -> Result<Vec<ChatChannel>, ChatPlatformError>;

    async fn search_members(
        &self,
        guild_id: &str,
        username: &str,
    ) -> Result<Vec<ChatUser>, ChatPlatformError>;

    async fn send_to_channel(
        &self,
        channel_id: &str,
        message: &ChatMessage,
    ) -> Result<ChatMessageReceipt, ChatPlatformError>;

    async fn send_to_user(
        &self,
        user_id: &str,
        message: &ChatMessage,
    ) -> Result<ChatMessageReceipt, ChatPlatformError>;
}
