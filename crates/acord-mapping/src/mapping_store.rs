use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Public struct `ChannelMapping` used across acord components.
pub struct ChannelMapping {
    pub project_id: u64,
    pub channel_name: String,
    pub guild_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Public struct `UserMapping` used across acord components.
pub struct UserMapping {
    pub discord_user: String,
    pub active_collab_user: u64,
}

/// Trait contract for `MappingStore` behavior.
///
/// Implementations are immutable once shared; every accessor is a plain read.
pub trait MappingStore: Send + Sync {
    fn channel_mappings(&self) -> &[ChannelMapping];

    fn user_mappings(&self) -> &[UserMapping];

    /// Rows for `project_id` in table order.
    fn channels_for_project(&self, project_id: u64) -> Vec<ChannelMapping> {
        self.channel_mappings()
            .iter()
            .filter(|mapping| mapping.project_id == project_id)
            .cloned()
            .collect()
    }

    fn discord_user_for(&self, active_collab_user: u64) -> Option<&str> {
        self.user_mappings()
            .iter()
            .find(|mapping| mapping.active_collab_user == active_collab_user)
            .map(|mapping| mapping.discord_user.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Public struct `StaticMappingStore` used across acord components.
pub struct StaticMappingStore {
    channels: Vec<ChannelMapping>,
    users: Vec<UserMapping>,
}

impl StaticMappingStore {
    pub fn new(channels: Vec<ChannelMapping>, users: Vec<UserMapping>) -> Self {
        Self { channels, users }
    }
}

impl MappingStore for StaticMappingStore {
    fn channel_mappings(&self) -> &[ChannelMapping] {
        &self.channels
    }

    fn user_mappings(&self) -> &[UserMapping] {
        &self.users
    }
}
