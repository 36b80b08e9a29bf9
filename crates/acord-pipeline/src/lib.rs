//! Event translation and command routing.
//!
//! [`EventDispatcher`] classifies webhook events and runs the task/comment
//! processors; [`deliver_processed_event`] fans the resulting notification out
//! to the project's channels; [`route_command`] dispatches chat commands by
//! address type.

pub mod command_actions;
pub mod command_router;
pub mod comment_processor;
pub mod delivery;
pub mod dispatch_error;
pub mod event_dispatcher;
pub mod task_processor;

#[cfg(test)]
pub(crate) mod test_support;

pub use command_actions::*;
pub use command_router::*;
pub use comment_processor::*;
pub use delivery::*;
pub use dispatch_error::*;
pub use event_dispatcher::*;
pub use task_processor::*;
