//! On-disk mapping file parsing and validation.
//!
//! The file is read once at startup. Validation rejects rows that would make
//! channel or user resolution ambiguous, so the in-memory store can stay a
//! plain read-only table.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::mapping_store::{ChannelMapping, StaticMappingStore, UserMapping};

pub const MAPPING_FILE_SCHEMA_VERSION: u32 = 1;

fn mapping_file_schema_version() -> u32 {
    MAPPING_FILE_SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `MappingFile` used across acord components.
pub struct MappingFile {
    #[serde(default = "mapping_file_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub channels: Vec<ChannelMapping>,
    #[serde(default)]
    pub users: Vec<UserMapping>,
}

impl Default for MappingFile {
    fn default() -> Self {
        Self {
            schema_version: MAPPING_FILE_SCHEMA_VERSION,
            channels: Vec::new(),
            users: Vec::new(),
        }
    }
}

impl MappingFile {
    pub fn into_store(self) -> StaticMappingStore {
        StaticMappingStore::new(self.channels, self.users)
    }
}

pub fn load_mapping_store(path: &Path) -> Result<StaticMappingStore> {
    Ok(load_mapping_file(path)?.into_store())
}

pub fn load_mapping_file(path: &Path) -> Result<MappingFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read mapping file {}", path.display()))?;
    parse_mapping_file(&raw).with_context(|| format!("invalid mapping file {}", path.display()))
}

pub fn parse_mapping_file(raw: &str) -> Result<MappingFile> {
    let mut parsed =
        serde_json::from_str::<MappingFile>(raw).context("failed to parse mapping file")?;
    normalize_mapping_file(&mut parsed)?;
    Ok(parsed)
}

fn normalize_mapping_file(file: &mut MappingFile) -> Result<()> {
    if file.schema_version != MAPPING_FILE_SCHEMA_VERSION {
        bail!(
            "unsupported mapping file schema_version {} (expected {})",
            file.schema_version,
            MAPPING_FILE_SCHEMA_VERSION
        );
    }

    let mut seen_channels = HashSet::new();
    for (index, channel) in file.channels.iter_mut().enumerate() {
        if channel.project_id == 0 {
            bail!("channel mapping index {index} has zero projectId");
        }
        let name = channel.channel_name.trim();
        if name.is_empty() {
            bail!("channel mapping index {index} has empty channelName");
        }
        channel.channel_name = name.to_string();
        let key = (
            channel.project_id,
            channel.channel_name.clone(),
            channel.guild_index,
        );
        if !seen_channels.insert(key) {
            bail!(
                "duplicate channel mapping for project {} -> '{}' (guild index {})",
                channel.project_id,
                channel.channel_name,
                channel.guild_index
            );
        }
    }

    let mut seen_discord_users = HashSet::new();
    let mut seen_active_collab_users = HashSet::new();
    for (index, user) in file.users.iter_mut().enumerate() {
        let tag = user.discord_user.trim();
        if tag.is_empty() {
            bail!("user mapping index {index} has empty discordUser");
        }
        user.discord_user = tag.to_string();
        if !seen_active_collab_users.insert(user.active_collab_user) {
            bail!(
                "duplicate user mapping for activeCollabUser {}",
                user.active_collab_user
            );
        }
        if !seen_discord_users.insert(user.discord_user.to_ascii_lowercase()) {
            bail!(
                "duplicate user mapping for discordUser '{}'",
                user.discord_user
            );
        }
    }
    Ok(())
}
