pub mod auth;
pub mod channels;
pub mod completions;
pub mod docs;
pub mod mail;
pub mod messages;
pub mod output;
pub mod tasks;
pub mod users;
pub mod webhooks;

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use m365_collab::{CollaborationProvider, Config, ProviderRegistry};

/// Microsoft 365 collaboration CLI: Teams, SharePoint, Outlook and Planner
#[derive(Parser, Debug)]
#[command(name = "m365-collab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (defaults to the config file setting)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Collaboration provider to use
    #[arg(short, long, default_value = "m365", global = true)]
    pub provider: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authentication commands
    Auth(auth::AuthCommand),

    /// Directory user operations
    Users(users::UsersCommand),

    /// Teams channel operations
    Channels(channels::ChannelsCommand),

    /// Teams channel messages
    Messages(messages::MessagesCommand),

    /// SharePoint document operations
    Docs(docs::DocsCommand),

    /// Planner task operations
    Tasks(tasks::TasksCommand),

    /// Outlook mail operations
    Mail(mail::MailCommand),

    /// List channels with a configured incoming webhook
    Webhooks,

    /// Generate shell completions
    Completions(completions::CompletionsCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// JSON output (best for AI agents)
    Json,
    /// Table output (best for humans)
    #[default]
    Table,
    /// Plain output (minimal, for scripting)
    Plain,
}

impl OutputFormat {
    pub fn from_config(config: &Config) -> Self {
        OutputFormat::from_str(&config.output.default_format, true).unwrap_or_default()
    }
}

/// Instantiate the named provider from the registry
pub fn open_provider(config: &Config, name: &str) -> Result<Box<dyn CollaborationProvider>> {
    ProviderRegistry::with_defaults()
        .create(name, config)
        .with_context(|| format!("Failed to initialize provider '{}'", name))
}

/// Take text from an argument or stdin
pub fn read_text(arg: Option<String>, stdin: bool, what: &str) -> Result<String> {
    let text = match arg {
        Some(text) => text,
        None if stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer.trim().to_string()
        }
        None => bail!("No {} provided. Pass it as an argument or use --stdin.", what),
    };

    if text.trim().is_empty() {
        bail!("{} cannot be empty", what);
    }
    Ok(text)
}
