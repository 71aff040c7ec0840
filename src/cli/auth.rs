use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use m365_collab::{Config, Credentials, M365Provider};

use super::output::{print_error, print_info, print_success};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Show which credentials are configured (no network access)
    Status,

    /// Acquire an app-only Graph token to verify the credentials
    Token,
}

pub async fn execute(cmd: AuthCommand, config: &Config) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Status => status(),
        AuthSubcommand::Token => token(config).await,
    }
}

fn status() -> Result<()> {
    match Credentials::from_env() {
        Ok(credentials) => {
            print_success("Credentials configured");
            print_info(&format!("Tenant: {}", credentials.tenant_id));
            print_info(&format!("Client: {}", credentials.client_id));
            Ok(())
        }
        Err(e) => {
            print_error("Credentials are incomplete");
            Err(e.into())
        }
    }
}

async fn token(config: &Config) -> Result<()> {
    let provider = M365Provider::from_config(config)?;
    let token = provider
        .graph()
        .access_token()
        .await
        .context("Token acquisition failed")?;

    let expires = DateTime::<Utc>::from_timestamp(token.expires as i64, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| token.expires.to_string());

    print_success("Acquired Microsoft Graph token");
    print_info(&format!("Expires: {}", expires));
    Ok(())
}
