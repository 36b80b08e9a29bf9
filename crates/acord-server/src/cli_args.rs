use std::path::PathBuf;

use acord_discord::DEFAULT_DISCORD_API_BASE;
use clap::Parser;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "acord",
    about = "Bridges ActiveCollab webhooks and chat commands to Discord",
    version
)]
/// Public struct `Cli` used across acord components.
pub struct Cli {
    #[arg(
        long,
        env = "ACORD_BIND",
        default_value = "127.0.0.1:8080",
        help = "Socket address the webhook/command server listens on"
    )]
    pub bind: String,

    #[arg(
        long = "activecollab-api-base",
        env = "ACORD_ACTIVECOLLAB_API_BASE",
        help = "ActiveCollab REST API base URL, e.g. https://pm.example.com/api/v1"
    )]
    pub activecollab_api_base: String,

    #[arg(
        long = "activecollab-web-base",
        env = "ACORD_ACTIVECOLLAB_WEB_BASE",
        help = "ActiveCollab web base URL used for notification links"
    )]
    pub activecollab_web_base: String,

    #[arg(
        long = "activecollab-token",
        env = "ACORD_ACTIVECOLLAB_TOKEN",
        hide_env_values = true,
        help = "ActiveCollab API token sent as X-Angie-AuthApiToken"
    )]
    pub activecollab_token: String,

    #[arg(
        long = "discord-api-base",
        env = "ACORD_DISCORD_API_BASE",
        default_value = DEFAULT_DISCORD_API_BASE,
        help = "Discord REST API base URL"
    )]
    pub discord_api_base: String,

    #[arg(
        long = "discord-bot-token",
        env = "ACORD_DISCORD_BOT_TOKEN",
        hide_env_values = true,
        help = "Discord bot token"
    )]
    pub discord_bot_token: String,

    #[arg(
        long = "mapping-file",
        env = "ACORD_MAPPING_FILE",
        help = "JSON file with project->channel and user->user mappings"
    )]
    pub mapping_file: PathBuf,

    #[arg(
        long = "webhook-secret",
        env = "ACORD_WEBHOOK_SECRET",
        hide_env_values = true,
        help = "Optional shared secret expected in the X-Angie-WebhookSecret header"
    )]
    pub webhook_secret: Option<String>,

    #[arg(
        long = "request-timeout-ms",
        env = "ACORD_REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64,
        help = "Timeout for outbound ActiveCollab and Discord requests"
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long = "log-level",
        env = "ACORD_LOG_LEVEL",
        default_value = "info",
        help = "Default tracing level when RUST_LOG is unset"
    )]
    pub log_level: String,
}
