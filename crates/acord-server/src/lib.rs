//! `acord` binary support: CLI, bootstrap wiring and the axum ingress.

pub mod bootstrap;
pub mod cli_args;
pub mod webhook_server;

pub use bootstrap::*;
pub use cli_args::*;
pub use webhook_server::*;
