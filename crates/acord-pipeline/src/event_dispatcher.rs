//! Webhook event classification.
//!
//! The dispatcher is the single place that matches on payload class and event
//! type. Shape rejections happen before any remote call; lookup failures are
//! wrapped with the step that produced them.

use std::sync::Arc;

use acord_contract::{
    CommentPayload, EventPayload, ProcessedEvent, RawEvent, TaskEventKind, TaskPayload,
    COMMENT_CREATED_EVENT_TYPE,
};
use acord_discord::UserResolver;
use acord_remote::{find_task_project_id, RemoteApi};
use serde_json::Value;

use crate::comment_processor::process_comment_event;
use crate::dispatch_error::DispatchError;
use crate::task_processor::{process_task_event, ProcessorContext};

#[derive(Clone)]
/// Public struct `EventDispatcher` used across acord components.
pub struct EventDispatcher {
    remote: Arc<dyn RemoteApi>,
    users: UserResolver,
    base_url: String,
}

impl EventDispatcher {
    pub fn new(
        remote: Arc<dyn RemoteApi>,
        users: UserResolver,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            remote,
            users,
            base_url: base_url.into(),
        }
    }

    /// Parses an untyped webhook body and dispatches it. Bodies that do not
    /// fit the event shape are reported with their raw JSON.
    pub async fn process_json_event(&self, raw: Value) -> Result<ProcessedEvent, DispatchError> {
        match RawEvent::from_value(raw.clone()) {
            Ok(event) => self.process_event(&event).await,
            Err(error) => {
                tracing::debug!(%error, "webhook body does not match the event shape");
                Err(DispatchError::InvalidEvent(raw.to_string()))
            }
        }
    }

    pub async fn process_event(&self, event: &RawEvent) -> Result<ProcessedEvent, DispatchError> {
        let Some(payload) = event.payload.as_ref() else {
            return Err(DispatchError::InvalidEvent(event.render_for_error()));
        };
        let timestamp = event.timestamp_rfc3339();
        let context = ProcessorContext {
            remote: self.remote.as_ref(),
            users: &self.users,
            base_url: &self.base_url,
            timestamp: timestamp.as_deref(),
        };

        match payload {
            EventPayload::Task(task) => self.dispatch_task(context, task, &event.event_type).await,
            EventPayload::Comment(comment) => {
                self.dispatch_comment(context, comment, &event.event_type).await
            }
            EventPayload::Unknown { class } => Err(DispatchError::UnknownEventClass(class.clone())),
        }
    }

    async fn dispatch_task(
        &self,
        context: ProcessorContext<'_>,
        task: &TaskPayload,
        event_type: &str,
    ) -> Result<ProcessedEvent, DispatchError> {
        let kind = TaskEventKind::from_event_type(event_type)
            .ok_or_else(|| DispatchError::UnknownTaskEventType(event_type.to_string()))?;
        let body = process_task_event(context, task, kind)
            .await
            .map_err(DispatchError::TaskEvent)?;
        tracing::info!(
            project_id = task.project_id,
            task_id = task.id,
            event_type = kind.as_str(),
            "task event processed"
        );
        Ok(ProcessedEvent {
            project_id: task.project_id,
            body,
        })
    }

    async fn dispatch_comment(
        &self,
        context: ProcessorContext<'_>,
        comment: &CommentPayload,
        event_type: &str,
    ) -> Result<ProcessedEvent, DispatchError> {
        if !comment.is_task_comment() {
            return Err(DispatchError::UnknownCommentParentType(comment.parent_type.clone()));
        }
        if event_type != COMMENT_CREATED_EVENT_TYPE {
            return Err(DispatchError::UnknownCommentEventType(event_type.to_string()));
        }

        let project_id = find_task_project_id(self.remote.as_ref(), comment.parent_id)
            .await
            .map_err(DispatchError::CommentProjectLookup)?
            .ok_or(DispatchError::CommentProjectNotFound(comment.parent_id))?;
        let body = process_comment_event(context, comment, project_id)
            .await
            .map_err(DispatchError::CommentEvent)?;
        tracing::info!(
            project_id,
            parent_id = comment.parent_id,
            "comment event processed"
        );
        Ok(ProcessedEvent { project_id, body })
    }
}
