//! CLI definition using clap derive.

use std::path::PathBuf;

use aight_core::ConfigType;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aight", about = "Entity matching and configuration assistant client", version)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/aight/config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Read device states from a JSON file instead of the host
    #[arg(long, global = true)]
    pub states: Option<PathBuf>,

    /// Host websocket URL (overrides config and AIGHT_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Access token (overrides config and AIGHT_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch device states and print them as JSON
    States(StatesOpts),
    /// Suggest entity ids for the token being typed
    Suggest(SuggestOpts),
    /// Score every device against a prompt
    Detect(PromptOpts),
    /// Show the domains and entities chat mode would send for a prompt
    Entities(PromptOpts),
    /// Generate a configuration from a prompt
    Generate(GenerateOpts),
    /// Validate a configuration file
    Validate(FileOpts),
    /// Preview a configuration file against live states
    Preview(FileOpts),
    /// Deploy a configuration file
    Deploy(FileOpts),
    /// Reload the assistant integration on the host
    Reload,
    /// Reload automations on the host
    ReloadAutomations,
    /// Interactive chat
    Chat,
}

#[derive(Args)]
pub struct StatesOpts {
    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct SuggestOpts {
    /// Input text; the last whitespace-separated token is completed
    #[arg(required_unless_present = "stream")]
    pub input: Option<String>,

    /// Read input revisions from stdin, one per line, and print one JSON line
    /// per settled revision
    #[arg(long, conflicts_with = "input")]
    pub stream: bool,

    /// Maximum suggestions (1-15; default from config)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Print the input with the Nth suggestion (1-based) applied
    #[arg(long, conflicts_with = "stream")]
    pub accept: Option<usize>,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PromptOpts {
    pub prompt: String,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct GenerateOpts {
    pub prompt: String,

    /// Configuration type (default: inferred from the prompt)
    #[arg(long = "type", short = 't')]
    pub config_type: Option<ConfigType>,

    /// Entity id to include; repeat for several. Skips detection.
    #[arg(long = "entity", short = 'e')]
    pub entities: Vec<String>,

    /// Accept every detected entity without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Write the generated YAML to a file
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct FileOpts {
    /// YAML file ("-" for stdin)
    pub file: PathBuf,

    #[arg(long = "type", short = 't', default_value = "automation")]
    pub config_type: ConfigType,
}
