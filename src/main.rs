mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use m365_collab::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "m365_collab=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;
    let format = cli.format.unwrap_or_else(|| cli::OutputFormat::from_config(&config));

    match cli.command {
        Commands::Auth(cmd) => cli::auth::execute(cmd, &config).await,
        Commands::Users(cmd) => cli::users::execute(cmd, &config, &cli.provider, format).await,
        Commands::Channels(cmd) => {
            cli::channels::execute(cmd, &config, &cli.provider, format).await
        }
        Commands::Messages(cmd) => {
            cli::messages::execute(cmd, &config, &cli.provider, format).await
        }
        Commands::Docs(cmd) => cli::docs::execute(cmd, &config, &cli.provider, format).await,
        Commands::Tasks(cmd) => cli::tasks::execute(cmd, &config, &cli.provider, format).await,
        Commands::Mail(cmd) => cli::mail::execute(cmd, &config, &cli.provider).await,
        Commands::Webhooks => cli::webhooks::execute(&config, format),
        Commands::Completions(cmd) => cli::completions::execute(cmd),
    }
}
