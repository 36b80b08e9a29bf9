//! Discord side of the bridge.
//!
//! Provides the [`ChatPlatform`] collaborator contract, a REST implementation,
//! embed rendering, and the resolvers that turn mapping-store rows into live
//! guild channels and members.

pub mod channel_resolver;
pub mod chat_platform;
pub mod discord_embed;
pub mod discord_rest_client;
pub mod resolve_error;
pub mod user_resolver;

pub use channel_resolver::*;
pub use chat_platform::*;
pub use discord_embed::*;
pub use discord_rest_client::*;
pub use resolve_error::*;
pub use user_resolver::*;
