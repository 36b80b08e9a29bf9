//! Task event enrichment.

use acord_contract::{NotificationDocument, TaskEventKind, TaskPayload, TASK_NOTIFICATION_COLOR};
use acord_discord::UserResolver;
use acord_remote::{task_list_name, RemoteApi};

use crate::dispatch_error::LookupFailure;

pub const NOT_ASSIGNED_LABEL: &str = "Not Assigned";
pub const ASSIGNEE_FIELD: &str = "Assignee";
pub const STATUS_FIELD: &str = "Status";

/// Collaborators shared by the task and comment processors.
#[derive(Clone, Copy)]
pub struct ProcessorContext<'a> {
    pub remote: &'a dyn RemoteApi,
    pub users: &'a UserResolver,
    pub base_url: &'a str,
    pub timestamp: Option<&'a str>,
}

pub fn task_title(kind: TaskEventKind, name: &str) -> String {
    let prefix = match kind {
        TaskEventKind::Created => "*Task Created:*",
        TaskEventKind::Completed => "*Task Completed:*",
        TaskEventKind::Updated | TaskEventKind::ListChanged => "*Task Updated:*",
    };
    format!("{prefix} {name}")
}

/// Joins the web base URL and a resource path; `None` when the path is empty.
pub fn resource_link(base_url: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let base = base_url.trim().trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}{path}"))
    } else {
        Some(format!("{base}/{path}"))
    }
}

/// Resolves the assignee, then the task-list name, and builds the
/// notification. The first failing step aborts the event.
pub async fn process_task_event(
    context: ProcessorContext<'_>,
    task: &TaskPayload,
    kind: TaskEventKind,
) -> Result<NotificationDocument, LookupFailure> {
    let assignee = if task.is_unassigned() {
        NOT_ASSIGNED_LABEL.to_string()
    } else {
        context.users.user_id(task.assignee_id).await?.mention()
    };
    let status = task_list_name(context.remote, task.project_id, task.task_list_id).await?;

    let title = task_title(kind, &task.name);
    let mut document = NotificationDocument::new(title, TASK_NOTIFICATION_COLOR)
        .with_inline_field(ASSIGNEE_FIELD, assignee)
        .with_inline_field(STATUS_FIELD, status)
        .with_timestamp(context.timestamp.map(str::to_string));
    if let Some(link) = resource_link(context.base_url, &task.url_path) {
        document = document.with_url(link);
    }
    Ok(document)
}
