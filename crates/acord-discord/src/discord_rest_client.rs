//! Discord REST (v10) implementation of [`ChatPlatform`].

use std::time::Duration;

use acord_contract::{truncate_for_error, ERROR_BODY_MAX_CHARS};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::chat_platform::{
    ChatChannel, ChatGuild, ChatMessage, ChatMessageReceipt, ChatPlatform, ChatPlatformError,
    ChatUser,
};
use crate::discord_embed::render_discord_message;

pub const DEFAULT_DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const GUILD_TEXT_CHANNEL_TYPE: u8 = 0;
const GUILD_ANNOUNCEMENT_CHANNEL_TYPE: u8 = 5;
const MEMBER_SEARCH_LIMIT: &str = "10";

#[derive(Debug, Clone, Deserialize)]
struct DiscordGuildResponse {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DiscordChannelResponse {
    id: String,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    guild_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DiscordUserResponse {
    id: String,
    username: String,
    #[serde(default)]
    discriminator: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DiscordMemberResponse {
    user: DiscordUserResponse,
}

#[derive(Debug, Clone, Deserialize)]
struct DiscordMessageResponse {
    id: String,
    channel_id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DiscordDmChannelResponse {
    id: String,
}

#[derive(Debug, Clone)]
/// Public struct `DiscordRestClientConfig` used across acord components.
pub struct DiscordRestClientConfig {
    pub api_base: String,
    pub bot_token: String,
    pub request_timeout_ms: u64,
}

#[derive(Clone)]
/// Public struct `DiscordRestClient` used across acord components.
pub struct DiscordRestClient {
    http: reqwest::Client,
    api_base: String,
}

impl DiscordRestClient {
    pub fn new(config: &DiscordRestClientConfig) -> Result<Self, ChatPlatformError> {
        let token = config.bot_token.trim();
        if token.is_empty() {
            return Err(ChatPlatformError::InvalidConfig(
                "discord bot token cannot be empty".to_string(),
            ));
        }
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("acord-bridge"));
        let auth_header = HeaderValue::from_str(&format!("Bot {token}")).map_err(|_| {
            ChatPlatformError::InvalidConfig("invalid discord authorization header".to_string())
        })?;
        headers.insert(AUTHORIZATION, auth_header);
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn request_json<T>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ChatPlatformError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(endpoint, status = status.as_u16(), "discord request failed");
            return Err(ChatPlatformError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: truncate_for_error(&body, ERROR_BODY_MAX_CHARS),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_message(
        &self,
        channel_id: &str,
        message: &ChatMessage,
    ) -> Result<ChatMessageReceipt, ChatPlatformError> {
        let endpoint = self.endpoint(&format!("/channels/{}/messages", channel_id.trim()));
        let payload = render_discord_message(message);
        let response: DiscordMessageResponse = self
            .request_json(&endpoint, self.http.post(&endpoint).json(&payload))
            .await?;
        Ok(ChatMessageReceipt {
            channel_id: response.channel_id,
            message_id: response.id,
        })
    }
}

#[async_trait]
impl ChatPlatform for DiscordRestClient {
    async fn guilds(&self) -> Result<Vec<ChatGuild>, ChatPlatformError> {
        let endpoint = self.endpoint("/users/@me/guilds");
        let rows: Vec<DiscordGuildResponse> = self
            .request_json(&endpoint, self.http.get(&endpoint))
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| ChatGuild {
                id: row.id,
                name: row.name,
            })
            .collect())
    }

    async fn guild_channels(
        &self,
        guild_id: &str,
    ) -> Result<Vec<ChatChannel>, ChatPlatformError> {
        let guild_id = guild_id.trim();
        let endpoint = self.endpoint(&format!("/guilds/{guild_id}/channels"));
        let rows: Vec<DiscordChannelResponse> = self
            .request_json(&endpoint, self.http.get(&endpoint))
            .await?;
        Ok(rows
            .into_iter()
            .filter(|row| {
                row.kind == GUILD_TEXT_CHANNEL_TYPE || row.kind == GUILD_ANNOUNCEMENT_CHANNEL_TYPE
            })
            .filter_map(|row| {
                let name = row.name?;
                Some(ChatChannel {
                    id: row.id,
                    name,
                    guild_id: row.guild_id.unwrap_or_else(|| guild_id.to_string()),
                })
            })
            .collect())
    }

    async fn search_members(
        &self,
        guild_id: &str,
        username: &str,
    ) -> Result<Vec<ChatUser>, ChatPlatformError> {
        let endpoint = self.endpoint(&format!("/guilds/{}/members/search", guild_id.trim()));
        let request = self
            .http
            .get(&endpoint)
            .query(&[("query", username), ("limit", MEMBER_SEARCH_LIMIT)]);
        let rows: Vec<DiscordMemberResponse> = self.request_json(&endpoint, request).await?;
        Ok(rows
            .into_iter()
            .map(|row| ChatUser {
                id: row.user.id,
                username: row.user.username,
                discriminator: row.user.discriminator,
            })
            .collect())
    }

    async fn send_to_channel(
        &self,
        channel_id: &str,
        message: &ChatMessage,
    ) -> Result<ChatMessageReceipt, ChatPlatformError> {
        self.post_message(channel_id, message).await
    }

    async fn send_to_user(
        &self,
        user_id: &str,
        message: &ChatMessage,
    ) -> Result<ChatMessageReceipt, ChatPlatformError> {
        let endpoint = self.endpoint("/users/@me/channels");
        let dm_channel: DiscordDmChannelResponse = self
            .request_json(
                &endpoint,
                self.http
                    .post(&endpoint)
                    .json(&json!({ "recipient_id": user_id.trim() })),
            )
            .await?;
        self.post_message(&dm_channel.id, message).await
    }
}
