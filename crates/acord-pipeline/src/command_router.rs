//! Chat command routing by address type.

use acord_contract::{CommandAddressKind, CommandEvent};
use async_trait::async_trait;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_BAD_GATEWAY: u16 = 502;

#[async_trait]
/// Trait contract for `CommandActions` behavior.
pub trait CommandActions: Send + Sync {
    async fn user_command(&self, event: &CommandEvent) -> u16;

    async fn channel_command(&self, event: &CommandEvent) -> u16;
}

/// Invokes exactly one action for `user` and `channel` addresses. Any other
/// address type invokes neither and yields 400.
pub async fn route_command(actions: &dyn CommandActions, event: &CommandEvent) -> u16 {
    match event.address_kind() {
        CommandAddressKind::User => actions.user_command(event).await,
        CommandAddressKind::Channel => actions.channel_command(event).await,
        CommandAddressKind::Unsupported(address_type) => {
            tracing::error!(
                address_type = %address_type,
                command = %event.command,
                "unknown address type / unsupported"
            );
            STATUS_BAD_REQUEST
        }
    }
}
