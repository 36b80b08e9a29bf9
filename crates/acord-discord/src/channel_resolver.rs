//! Project id -> live Discord channel resolution.
//!
//! Every mapping row is matched against the live channel list by channel name
//! and the guild found at the row's guild index. Partial coverage returns the
//! channels that exist and logs the rest; zero coverage is an error. A guild
//! whose channel listing fails only loses its own rows.

use std::sync::Arc;

use acord_mapping::{ChannelMapping, MappingStore};
use serde::Serialize;

use crate::chat_platform::{ChatChannel, ChatGuild, ChatPlatform};
use crate::resolve_error::ResolveError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Public struct `MissingChannel` used across acord components.
pub struct MissingChannel {
    pub channel_name: String,
    pub guild_index: usize,
    pub guild_label: String,
}

impl MissingChannel {
    pub fn label(&self) -> String {
        format!("{} ({})", self.channel_name, self.guild_label)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Public struct `ChannelResolution` used across acord components.
pub struct ChannelResolution {
    pub channels: Vec<ChatChannel>,
    pub missing: Vec<MissingChannel>,
}

impl ChannelResolution {
    pub fn is_partial(&self) -> bool {
        !self.channels.is_empty() && !self.missing.is_empty()
    }

    pub fn missing_summary(&self) -> String {
        render_missing_channels(&self.missing)
    }
}

#[derive(Clone)]
/// Public struct `ChannelResolver` used across acord components.
pub struct ChannelResolver {
    mappings: Arc<dyn MappingStore>,
    chat: Arc<dyn ChatPlatform>,
}

impl ChannelResolver {
    pub fn new(mappings: Arc<dyn MappingStore>, chat: Arc<dyn ChatPlatform>) -> Self {
        Self { mappings, chat }
    }

    pub async fn determine_channels(
        &self,
        project_id: u64,
    ) -> Result<ChannelResolution, ResolveError> {
        if project_id == 0 {
            return Err(ResolveError::InvalidProjectId(project_id));
        }
        let rows = self.mappings.channels_for_project(project_id);
        if rows.is_empty() {
            return Err(ResolveError::ChannelsNotMapped(project_id));
        }

        let guilds = self.chat.guilds().await?;
        let live_channels = self.live_channels(&rows, &guilds).await;
        let resolution = match_channel_mappings(&rows, &guilds, &live_channels);

        if resolution.channels.is_empty() {
            return Err(ResolveError::ChannelsMissing(resolution.missing_summary()));
        }
        if resolution.is_partial() {
            tracing::warn!(
                project_id,
                "Unable to find channels: {}",
                resolution.missing_summary()
            );
        }
        Ok(resolution)
    }

    /// Lists channels of the guilds the rows address.
    async fn live_channels(
        &self,
        rows: &[ChannelMapping],
        guilds: &[ChatGuild],
    ) -> Vec<ChatChannel> {
        let mut channels = Vec::new();
        for (index, guild) in guilds.iter().enumerate() {
            if !rows.iter().any(|row| row.guild_index == index) {
                continue;
            }
            match self.chat.guild_channels(&guild.id).await {
                Ok(listed) => channels.extend(listed),
                Err(error) => tracing::warn!(
                    guild_id = %guild.id,
                    guild = %guild.name,
                    %error,
                    "skipping guild whose channel listing failed"
                ),
            }
        }
        channels
    }
}

/// Partitions `rows` into matched live channels and missing rows, both in
/// mapping order.
pub fn match_channel_mappings(
    rows: &[ChannelMapping],
    guilds: &[ChatGuild],
    live_channels: &[ChatChannel],
) -> ChannelResolution {
    let mut channels = Vec::new();
    let mut missing = Vec::new();
    for row in rows {
        let guild = guilds.get(row.guild_index);
        let found = guild.and_then(|guild| {
            live_channels
                .iter()
                .find(|channel| channel.guild_id == guild.id && channel.name == row.channel_name)
        });
        match found {
            Some(channel) => channels.push(channel.clone()),
            None => missing.push(MissingChannel {
                channel_name: row.channel_name.clone(),
                guild_index: row.guild_index,
                guild_label: guild
                    .map(|guild| guild.name.clone())
                    .unwrap_or_else(|| format!("guild #{}", row.guild_index)),
            }),
        }
    }
    ChannelResolution { channels, missing }
}

pub fn render_missing_channels(missing: &[MissingChannel]) -> String {
    missing
        .iter()
        .map(MissingChannel::label)
        .collect::<Vec<_>>()
        .join(", ")
}
