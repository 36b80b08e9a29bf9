//! Comment event enrichment.

use acord_contract::{CommentPayload, NotificationDocument, COMMENT_NOTIFICATION_COLOR};
use acord_remote::task_name;

use crate::dispatch_error::LookupFailure;
use crate::task_processor::{resource_link, ProcessorContext};

pub const AUTHOR_FIELD: &str = "Author";

pub fn comment_title(task_name: &str) -> String {
    format!("*Comment Added to Task:* {task_name}")
}

/// Builds the comment notification for a task comment whose project has
/// already been resolved by the dispatcher.
pub async fn process_comment_event(
    context: ProcessorContext<'_>,
    comment: &CommentPayload,
    project_id: u64,
) -> Result<NotificationDocument, LookupFailure> {
    let author = context.users.user_id(comment.created_by_id).await?.mention();
    let parent_name = task_name(context.remote, project_id, comment.parent_id).await?;

    let mut document =
        NotificationDocument::new(comment_title(&parent_name), COMMENT_NOTIFICATION_COLOR)
            .with_description(comment.body.clone())
            .with_inline_field(AUTHOR_FIELD, author)
            .with_timestamp(context.timestamp.map(str::to_string));
    let path = format!("projects/{project_id}/tasks/{}", comment.parent_id);
    if let Some(link) = resource_link(context.base_url, &path) {
        document = document.with_url(link);
    }
    Ok(document)
}
