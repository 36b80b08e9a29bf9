//! Read-only mapping tables between ActiveCollab ids and Discord endpoints.
//!
//! The store is loaded once at startup and shared behind
//! [`MappingStore`] so resolvers never reach for global state.

pub mod mapping_file;
pub mod mapping_store;

pub use mapping_file::*;
pub use mapping_store::*;
