//! Wire contracts shared by the acord webhook and command pipelines.
//!
//! Covers the inbound ActiveCollab webhook event, the inbound chat command
//! envelope, and the transport-neutral notification document handed to the
//! delivery layer.
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use acord_contract::{EventPayload, RawEvent};
//!
//! let raw = r#"{
//!   "type": "TaskCreated",
//!   "timestamp": 1700000000,
//!   "payload": {
//!     "class": "Task",
//!     "id": 9,
//!     "name": "Ship it",
//!     "project_id": 5,
//!     "assignee_id": 0,
//!     "task_list_id": 2,
//!     "url_path": "/projects/5/tasks/9",
//!     "is_completed": false
//!   }
//! }"#;
//!
//! let event: RawEvent = serde_json::from_str(raw)?;
//! assert_eq!(event.event_type, "TaskCreated");
//! assert!(matches!(event.payload, Some(EventPayload::Task(_))));
//! # Ok(())
//! # }
//! ```

pub mod command_event;
pub mod error_body;
pub mod notification;
pub mod raw_event;

pub use command_event::*;
pub use error_body::*;
pub use notification::*;
pub use raw_event::*;
