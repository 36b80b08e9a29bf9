//! Inbound webhook event contract.
//!
//! Payloads are discriminated by their `class` field. A class outside the
//! known set is kept as [`EventPayload::Unknown`] so the dispatcher can reject
//! it by name instead of falling through silently.

use chrono::{DateTime, Utc};
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

pub const TASK_PAYLOAD_CLASS: &str = "Task";
pub const COMMENT_PAYLOAD_CLASS: &str = "Comment";
pub const COMMENT_PARENT_TYPE_TASK: &str = "Task";
pub const COMMENT_CREATED_EVENT_TYPE: &str = "CommentCreated";
/// `assignee_id` value ActiveCollab sends for unassigned tasks.
pub const UNASSIGNED_USER_ID: u64 = 0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `TaskPayload` used across acord components.
pub struct TaskPayload {
    pub id: u64,
    pub name: String,
    pub project_id: u64,
    #[serde(default)]
    pub assignee_id: u64,
    pub task_list_id: u64,
    #[serde(default)]
    pub url_path: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl TaskPayload {
    pub fn is_unassigned(&self) -> bool {
        self.assignee_id == UNASSIGNED_USER_ID
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `CommentPayload` used across acord components.
pub struct CommentPayload {
    #[serde(default)]
    pub id: u64,
    pub parent_type: String,
    pub parent_id: u64,
    #[serde(default)]
    pub body: String,
    pub created_by_id: u64,
    #[serde(default)]
    pub url_path: String,
}

impl CommentPayload {
    pub fn is_task_comment(&self) -> bool {
        self.parent_type == COMMENT_PARENT_TYPE_TASK
    }
}

#[derive(Debug, Error)]
/// Enumerates supported `PayloadShapeError` values.
pub enum PayloadShapeError {
    #[error("payload is missing its class field")]
    MissingClass,
    #[error("{class} payload is malformed: {source}")]
    Malformed {
        class: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `EventPayload` values.
pub enum EventPayload {
    Task(TaskPayload),
    Comment(CommentPayload),
    Unknown { class: String },
}

impl EventPayload {
    pub fn class(&self) -> &str {
        match self {
            Self::Task(_) => TASK_PAYLOAD_CLASS,
            Self::Comment(_) => COMMENT_PAYLOAD_CLASS,
            Self::Unknown { class } => class.as_str(),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, PayloadShapeError> {
        let class = value
            .get("class")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|class| !class.is_empty())
            .ok_or(PayloadShapeError::MissingClass)?
            .to_string();
        let parsed = match class.as_str() {
            TASK_PAYLOAD_CLASS => serde_json::from_value(value).map(Self::Task),
            COMMENT_PAYLOAD_CLASS => serde_json::from_value(value).map(Self::Comment),
            _ => {
                return Ok(Self::Unknown {
                    class: class.clone(),
                })
            }
        };
        parsed.map_err(|source| PayloadShapeError::Malformed { class, source })
    }
}

impl<'de> Deserialize<'de> for EventPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl Serialize for EventPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut value = match self {
            Self::Task(task) => serde_json::to_value(task).map_err(S::Error::custom)?,
            Self::Comment(comment) => serde_json::to_value(comment).map_err(S::Error::custom)?,
            Self::Unknown { .. } => Value::Object(Map::new()),
        };
        if let Value::Object(object) = &mut value {
            object.insert("class".to_string(), Value::String(self.class().to_string()));
        }
        value.serialize(serializer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `RawEvent` used across acord components.
pub struct RawEvent {
    #[serde(default)]
    pub payload: Option<EventPayload>,
    #[serde(default, deserialize_with = "deserialize_display_timestamp")]
    pub timestamp: Option<Number>,
    #[serde(rename = "type", default)]
    pub event_type: String,
}

impl RawEvent {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Unix-seconds `timestamp` as RFC 3339, when present and in range.
    pub fn timestamp_rfc3339(&self) -> Option<String> {
        let timestamp = self.timestamp.as_ref()?;
        let seconds = match timestamp.as_i64() {
            Some(seconds) => seconds,
            // Float casts saturate; out-of-range seconds fail in `from_timestamp`.
            None => timestamp.as_f64().filter(|value| value.is_finite())?.trunc() as i64,
        };
        DateTime::<Utc>::from_timestamp(seconds, 0).map(|moment| moment.to_rfc3339())
    }

    pub fn render_for_error(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

// The timestamp is display-only; a value that is not a JSON number is dropped.
fn deserialize_display_timestamp<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => Some(number),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Enumerates supported `TaskEventKind` values.
pub enum TaskEventKind {
    Created,
    Updated,
    Completed,
    ListChanged,
}

impl TaskEventKind {
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "TaskCreated" => Some(Self::Created),
            "TaskUpdated" => Some(Self::Updated),
            "TaskCompleted" => Some(Self::Completed),
            "TaskListChanged" => Some(Self::ListChanged),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "TaskCreated",
            Self::Updated => "TaskUpdated",
            Self::Completed => "TaskCompleted",
            Self::ListChanged => "TaskListChanged",
        }
    }
}
