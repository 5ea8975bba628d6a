//! aight: entity autocomplete, detection and configuration assistant client.

use aight_runtime::app::App;
use aight_runtime::cli::{self, Command};
use aight_runtime::config::Config;
use aight_runtime::{chat, cmd_config, cmd_detect, cmd_generate, cmd_reload, cmd_states, cmd_suggest};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("AIGHT_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    config.apply_cli(args.url, args.token);
    config.validate()?;
    tracing::debug!(url = %config.server.url, "configuration resolved");

    let app = App::new(config, args.states);

    match args.command {
        Command::States(opts) => cmd_states::cmd_states(&app, opts).await?,
        Command::Suggest(opts) => cmd_suggest::cmd_suggest(&app, opts).await?,
        Command::Detect(opts) => cmd_detect::cmd_detect(&app, opts).await?,
        Command::Entities(opts) => cmd_detect::cmd_entities(&app, opts).await?,
        Command::Generate(opts) => cmd_generate::cmd_generate(&app, opts).await?,
        Command::Validate(opts) => cmd_config::cmd_validate(&app, opts).await?,
        Command::Preview(opts) => cmd_config::cmd_preview(&app, opts).await?,
        Command::Deploy(opts) => cmd_config::cmd_deploy(&app, opts).await?,
        Command::Reload => cmd_reload::cmd_reload(&app).await?,
        Command::ReloadAutomations => cmd_reload::cmd_reload_automations(&app).await?,
        Command::Chat => chat::cmd_chat(&app).await?,
    }

    Ok(())
}
