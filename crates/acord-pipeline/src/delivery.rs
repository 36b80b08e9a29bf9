//! Fan-out of processed notifications to the project's live channels.

use acord_contract::ProcessedEvent;
use acord_discord::{
    ChannelResolver, ChatMessage, ChatMessageReceipt, ChatPlatform, MissingChannel, ResolveError,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Public struct `DeliveryFailure` used across acord components.
pub struct DeliveryFailure {
    pub channel_id: String,
    pub channel_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
/// Public struct `DeliveryReport` used across acord components.
pub struct DeliveryReport {
    pub project_id: u64,
    pub delivered: Vec<ChatMessageReceipt>,
    pub failed: Vec<DeliveryFailure>,
    pub missing: Vec<MissingChannel>,
}

#[derive(Debug, Error)]
/// Enumerates supported `DeliveryError` values.
pub enum DeliveryError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("notification for project {project_id} was not delivered to any channel")]
    NothingDelivered {
        project_id: u64,
        failures: Vec<DeliveryFailure>,
    },
}

/// Resolves the project's channels and sends the notification to each one in
/// mapping order. Individual send failures are logged and reported; the call
/// fails only when no channel accepted the message.
pub async fn deliver_processed_event(
    resolver: &ChannelResolver,
    chat: &dyn ChatPlatform,
    event: &ProcessedEvent,
) -> Result<DeliveryReport, DeliveryError> {
    let resolution = resolver.determine_channels(event.project_id).await?;
    let message = ChatMessage::Notification(event.body.clone());

    let mut delivered = Vec::new();
    let mut failed = Vec::new();
    for channel in &resolution.channels {
        match chat.send_to_channel(&channel.id, &message).await {
            Ok(receipt) => delivered.push(receipt),
            Err(error) => {
                tracing::warn!(
                    project_id = event.project_id,
                    channel_id = %channel.id,
                    channel_name = %channel.name,
                    %error,
                    "notification delivery failed"
                );
                failed.push(DeliveryFailure {
                    channel_id: channel.id.clone(),
                    channel_name: channel.name.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    if delivered.is_empty() {
        return Err(DeliveryError::NothingDelivered {
            project_id: event.project_id,
            failures: failed,
        });
    }
    Ok(DeliveryReport {
        project_id: event.project_id,
        delivered,
        failed,
        missing: resolution.missing,
    })
}
