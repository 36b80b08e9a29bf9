use std::sync::Arc;

use acord_discord::{
    ChannelResolver, ChatPlatform, DiscordRestClient, DiscordRestClientConfig, UserResolver,
};
use acord_mapping::{load_mapping_store, MappingStore};
use acord_pipeline::{ChatCommandActions, EventDispatcher};
use acord_remote::{ActiveCollabClient, ActiveCollabClientConfig, RemoteApi};
use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli_args::Cli;
use crate::webhook_server::{run_acord_server, AcordServerState};

/// Installs the fmt subscriber. `RUST_LOG` wins over `default_level`; an
/// unparsable level falls back to `info`.
pub fn init_tracing(default_level: &str) {
    let default_directive = default_level
        .trim()
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_directive.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

pub fn build_server_state(cli: &Cli) -> Result<Arc<AcordServerState>> {
    let mappings: Arc<dyn MappingStore> = Arc::new(
        load_mapping_store(&cli.mapping_file)
            .with_context(|| format!("failed to load {}", cli.mapping_file.display()))?,
    );
    let remote: Arc<dyn RemoteApi> = Arc::new(
        ActiveCollabClient::new(&ActiveCollabClientConfig {
            api_base: cli.activecollab_api_base.clone(),
            token: cli.activecollab_token.clone(),
            request_timeout_ms: cli.request_timeout_ms,
        })
        .context("failed to build ActiveCollab client")?,
    );
    let chat: Arc<dyn ChatPlatform> = Arc::new(
        DiscordRestClient::new(&DiscordRestClientConfig {
            api_base: cli.discord_api_base.clone(),
            bot_token: cli.discord_bot_token.clone(),
            request_timeout_ms: cli.request_timeout_ms,
        })
        .context("failed to build Discord client")?,
    );

    let users = UserResolver::new(mappings.clone(), chat.clone());
    Ok(Arc::new(AcordServerState {
        dispatcher: EventDispatcher::new(
            remote.clone(),
            users,
            cli.activecollab_web_base.trim(),
        ),
        channels: ChannelResolver::new(mappings, chat.clone()),
        chat: chat.clone(),
        actions: Arc::new(ChatCommandActions::new(remote, chat)),
        webhook_secret: cli
            .webhook_secret
            .as_deref()
            .map(str::trim)
            .filter(|secret| !secret.is_empty())
            .map(str::to_string),
    }))
}

pub async fn run(cli: Cli) -> Result<()> {
    let state = build_server_state(&cli)?;
    run_acord_server(&cli.bind, state).await
}
