use anyhow::Result;
use clap::{Args, Subcommand};
use m365_collab::Config;

use super::output::print_success;
use super::{open_provider, read_text};

#[derive(Args, Debug)]
pub struct MailCommand {
    #[command(subcommand)]
    pub command: MailSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MailSubcommand {
    /// Send an email
    Send {
        /// Recipient email address(es), comma-separated
        #[arg(short, long)]
        to: String,

        /// Email subject
        #[arg(short, long)]
        subject: String,

        /// Email body (omit to use --stdin)
        body: Option<String>,

        /// Sending user ID or UPN (default: first directory user)
        #[arg(long)]
        from: Option<String>,

        /// Read body from stdin
        #[arg(long)]
        stdin: bool,
    },
}

pub async fn execute(cmd: MailCommand, config: &Config, provider: &str) -> Result<()> {
    match cmd.command {
        MailSubcommand::Send {
            to,
            subject,
            body,
            from,
            stdin,
        } => {
            let body = read_text(body, stdin, "email body")?;
            let recipients: Vec<String> = to.split(',').map(|s| s.trim().to_string()).collect();

            let provider = open_provider(config, provider)?;
            provider
                .send_email(&recipients, &subject, &body, from.as_deref())
                .await?;

            print_success(&format!("Email sent to {}", recipients.join(", ")));
            Ok(())
        }
    }
}
