//! Built-in chat command actions.
//!
//! Replies go back to the address the command came from: a DM for `user`
//! addresses, a channel post for `channel` addresses.

use std::sync::Arc;

use acord_contract::{CommandEvent, NotificationDocument, COMMAND_REPLY_COLOR};
use acord_discord::{ChatMessage, ChatPlatform, ChatPlatformError};
use acord_remote::{list_projects, RemoteApi, RemoteApiError};
use async_trait::async_trait;
use thiserror::Error;

use crate::command_router::{
    CommandActions, STATUS_BAD_GATEWAY, STATUS_BAD_REQUEST, STATUS_NOT_FOUND, STATUS_OK,
};

pub const HELP_COMMAND: &str = "help";
pub const PROJECTS_COMMAND: &str = "projects";

#[derive(Debug, Error)]
/// Enumerates supported `CommandError` values.
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("command address is empty")]
    MissingAddress,
    #[error("remote lookup failed: {0}")]
    Remote(#[from] RemoteApiError),
    #[error("reply delivery failed: {0}")]
    Chat(#[from] ChatPlatformError),
}

impl CommandError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownCommand(_) => STATUS_NOT_FOUND,
            Self::MissingAddress => STATUS_BAD_REQUEST,
            Self::Remote(_) | Self::Chat(_) => STATUS_BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplyTarget {
    User,
    Channel,
}

#[derive(Clone)]
/// Public struct `ChatCommandActions` used across acord components.
pub struct ChatCommandActions {
    remote: Arc<dyn RemoteApi>,
    chat: Arc<dyn ChatPlatform>,
}

impl ChatCommandActions {
    pub fn new(remote: Arc<dyn RemoteApi>, chat: Arc<dyn ChatPlatform>) -> Self {
        Self { remote, chat }
    }

    /// Builds the reply for a command without sending it.
    pub async fn build_reply(&self, event: &CommandEvent) -> Result<ChatMessage, CommandError> {
        let command = event.normalized_command();
        match command.as_str() {
            HELP_COMMAND => Ok(ChatMessage::Notification(
                NotificationDocument::new("Available commands", COMMAND_REPLY_COLOR)
                    .with_description(render_help()),
            )),
            PROJECTS_COMMAND => {
                let projects = list_projects(self.remote.as_ref()).await?;
                let description = if projects.is_empty() {
                    "No projects found.".to_string()
                } else {
                    projects
                        .iter()
                        .map(|project| format!("{}: {}", project.id, project.name))
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                Ok(ChatMessage::Notification(
                    NotificationDocument::new("Projects", COMMAND_REPLY_COLOR)
                        .with_description(description),
                ))
            }
            _ => Err(CommandError::UnknownCommand(command)),
        }
    }

    async fn respond(&self, event: &CommandEvent, target: ReplyTarget) -> u16 {
        match self.try_respond(event, target).await {
            Ok(()) => STATUS_OK,
            Err(error) => {
                tracing::warn!(
                    command = %event.command,
                    address = %event.address,
                    %error,
                    "chat command failed"
                );
                error.status_code()
            }
        }
    }

    async fn try_respond(
        &self,
        event: &CommandEvent,
        target: ReplyTarget,
    ) -> Result<(), CommandError> {
        let address = event.address.trim();
        if address.is_empty() {
            return Err(CommandError::MissingAddress);
        }
        let reply = self.build_reply(event).await?;
        let receipt = match target {
            ReplyTarget::User => self.chat.send_to_user(address, &reply).await?,
            ReplyTarget::Channel => self.chat.send_to_channel(address, &reply).await?,
        };
        tracing::debug!(
            command = %event.command,
            channel_id = %receipt.channel_id,
            message_id = %receipt.message_id,
            "chat command answered"
        );
        Ok(())
    }
}

#[async_trait]
impl CommandActions for ChatCommandActions {
    async fn user_command(&self, event: &CommandEvent) -> u16 {
        self.respond(event, ReplyTarget::User).await
    }

    async fn channel_command(&self, event: &CommandEvent) -> u16 {
        self.respond(event, ReplyTarget::Channel).await
    }
}

fn render_help() -> String {
    [
        format!("!{HELP_COMMAND} - show this message"),
        format!("!{PROJECTS_COMMAND} - list ActiveCollab projects"),
    ]
    .join("\n")
}
