use anyhow::Result;
use clap::{Args, Subcommand};
use m365_collab::Config;
use serde::Serialize;
use tabled::Tabled;

use super::output::{print_output, truncate};
use super::{open_provider, OutputFormat};

#[derive(Args, Debug)]
pub struct ChannelsCommand {
    #[command(subcommand)]
    pub command: ChannelsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ChannelsSubcommand {
    /// List channels of a team, or of the first teams in the tenant
    List {
        /// Team ID
        #[arg(short, long)]
        team: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct ChannelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Team")]
    team: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub async fn execute(
    cmd: ChannelsCommand,
    config: &Config,
    provider: &str,
    format: OutputFormat,
) -> Result<()> {
    let provider = open_provider(config, provider)?;

    match cmd.command {
        ChannelsSubcommand::List { team } => {
            let channels = provider.list_channels(team.as_deref()).await?;
            let rows: Vec<ChannelRow> = channels
                .into_iter()
                .map(|channel| ChannelRow {
                    id: channel.id,
                    name: channel.name,
                    team: channel.team_name.unwrap_or(channel.team_id),
                    description: truncate(&channel.description.unwrap_or_default(), 40),
                })
                .collect();
            print_output(&rows, format)
        }
    }
}
