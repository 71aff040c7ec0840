use anyhow::Result;
use clap::{Args, Subcommand};
use m365_collab::types::PostReceipt;
use m365_collab::Config;
use serde::Serialize;
use tabled::Tabled;

use super::output::{print_output, print_single, print_success, strip_html, truncate};
use super::{open_provider, read_text, OutputFormat};

#[derive(Args, Debug)]
pub struct MessagesCommand {
    #[command(subcommand)]
    pub command: MessagesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MessagesSubcommand {
    /// Get recent messages from a team channel
    List {
        /// Team ID
        #[arg(short, long)]
        team: Option<String>,

        /// Channel ID
        #[arg(short, long)]
        channel: String,

        /// Maximum number of messages to retrieve
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Post to a channel: a webhook name, or TEAM_ID/CHANNEL_ID for Graph
    Post {
        /// Webhook channel name or TEAM_ID/CHANNEL_ID
        channel: String,

        /// Message text (omit to use --stdin)
        text: Option<String>,

        /// Title shown as a card heading
        #[arg(long)]
        title: Option<String>,

        /// Read text from stdin
        #[arg(long)]
        stdin: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct MessageRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Content")]
    content: String,
}

pub async fn execute(
    cmd: MessagesCommand,
    config: &Config,
    provider: &str,
    format: OutputFormat,
) -> Result<()> {
    let provider = open_provider(config, provider)?;

    match cmd.command {
        MessagesSubcommand::List {
            team,
            channel,
            limit,
        } => {
            let messages = provider
                .get_messages(&channel, limit, team.as_deref())
                .await?;
            match format {
                OutputFormat::Json => print_single(&messages),
                _ => {
                    let rows: Vec<MessageRow> = messages
                        .into_iter()
                        .map(|msg| MessageRow {
                            id: msg.id,
                            from: msg.sender,
                            time: msg.timestamp,
                            content: truncate(&strip_html(&msg.content), 60),
                        })
                        .collect();
                    print_output(&rows, format)
                }
            }
        }
        MessagesSubcommand::Post {
            channel,
            text,
            title,
            stdin,
        } => {
            let text = read_text(text, stdin, "message")?;
            let receipt = provider
                .post_message(&channel, &text, title.as_deref())
                .await?;
            match format {
                OutputFormat::Json => print_single(&receipt),
                _ => {
                    match receipt {
                        PostReceipt::Webhook { channel } => {
                            print_success(&format!("Posted to '{}' via webhook", channel))
                        }
                        PostReceipt::Graph { message_id } => {
                            print_success(&format!("Posted message {}", message_id))
                        }
                    }
                    Ok(())
                }
            }
        }
    }
}
