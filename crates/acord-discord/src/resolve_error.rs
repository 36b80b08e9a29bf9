use thiserror::Error;

use crate::chat_platform::ChatPlatformError;

#[derive(Debug, Error)]
/// Enumerates supported `ResolveError` values.
pub enum ResolveError {
    #[error("Project ID not valid: {0}")]
    InvalidProjectId(u64),
    #[error("Channels not found for project ID: {0}")]
    ChannelsNotMapped(u64),
    #[error("Channels do not exist on Discord: {0}")]
    ChannelsMissing(String),
    #[error("No Discord user mapped for ActiveCollab user: {0}")]
    UserNotMapped(u64),
    #[error("Discord user not found: {0}")]
    MemberNotFound(String),
    #[error(transparent)]
    Platform(#[from] ChatPlatformError),
}
