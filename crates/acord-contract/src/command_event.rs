//! Inbound chat command envelope.

use serde::{Deserialize, Serialize};

pub const USER_ADDRESS_TYPE: &str = "user";
pub const CHANNEL_ADDRESS_TYPE: &str = "channel";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
/// Public struct `CommandEvent` used across acord components.
pub struct CommandEvent {
    pub command: String,
    #[serde(default)]
    pub address_type: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `CommandAddressKind` values.
pub enum CommandAddressKind {
    User,
    Channel,
    Unsupported(String),
}

impl CommandAddressKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            USER_ADDRESS_TYPE => Self::User,
            CHANNEL_ADDRESS_TYPE => Self::Channel,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl CommandEvent {
    pub fn address_kind(&self) -> CommandAddressKind {
        CommandAddressKind::parse(&self.address_type)
    }

    /// Command name without a leading `!` or `/` prefix, lowercased.
    pub fn normalized_command(&self) -> String {
        self.command
            .trim()
            .trim_start_matches(&['!', '/'][..])
            .to_ascii_lowercase()
    }
}
