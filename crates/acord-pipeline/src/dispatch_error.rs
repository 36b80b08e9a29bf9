use acord_discord::ResolveError;
use acord_remote::RemoteApiError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `LookupFailure` values.
pub enum LookupFailure {
    #[error(transparent)]
    User(#[from] ResolveError),
    #[error(transparent)]
    Remote(#[from] RemoteApiError),
}

#[derive(Debug, Error)]
/// Enumerates supported `DispatchError` values.
///
/// Display strings are the user-facing failure messages returned to the
/// webhook caller.
pub enum DispatchError {
    #[error("Received invalid event: {0}")]
    InvalidEvent(String),
    #[error("Received Task Event with unknown payload type: {0}")]
    UnknownTaskEventType(String),
    #[error("Received Comment Event with unknown parent type: {0}")]
    UnknownCommentParentType(String),
    #[error("Received Comment Event with unknown payload type: {0}")]
    UnknownCommentEventType(String),
    #[error("Received Event of unknown type: {0}")]
    UnknownEventClass(String),
    #[error("Unable to process Task Event: {0}")]
    TaskEvent(#[source] LookupFailure),
    #[error("Unable to process Comment Event: {0}")]
    CommentEvent(#[source] LookupFailure),
    #[error("Project ID not found for Comment with parent: {0}")]
    CommentProjectNotFound(u64),
    #[error("Error processing Comment: {0}")]
    CommentProjectLookup(#[source] RemoteApiError),
}

impl DispatchError {
    /// Stable machine-readable code for logs and API responses.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::InvalidEvent(_) => "invalid_event",
            Self::UnknownTaskEventType(_) => "unknown_task_event_type",
            Self::UnknownCommentParentType(_) => "unknown_comment_parent_type",
            Self::UnknownCommentEventType(_) => "unknown_comment_event_type",
            Self::UnknownEventClass(_) => "unknown_event_class",
            Self::TaskEvent(_) => "task_event_lookup_failed",
            Self::CommentEvent(_) => "comment_event_lookup_failed",
            Self::CommentProjectNotFound(_) => "comment_project_not_found",
            Self::CommentProjectLookup(_) => "comment_project_lookup_failed",
        }
    }

    /// True when the event was rejected on shape alone, before any lookup.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidEvent(_)
                | Self::UnknownTaskEventType(_)
                | Self::UnknownCommentParentType(_)
                | Self::UnknownCommentEventType(_)
                | Self::UnknownEventClass(_)
        )
    }
}
