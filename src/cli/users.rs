use anyhow::Result;
use clap::{Args, Subcommand};
use m365_collab::types::User;
use m365_collab::Config;
use serde::Serialize;
use tabled::Tabled;

use super::output::{print_output, print_single};
use super::{open_provider, OutputFormat};

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// List users in the tenant
    List {
        /// Maximum number of users to retrieve
        #[arg(short, long, default_value = "25")]
        limit: usize,
    },

    /// Show a user by ID or user principal name
    Show {
        /// User ID or UPN
        user_id: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Department")]
    department: String,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.display_name,
            email: user.email.unwrap_or_default(),
            department: user.department.unwrap_or_default(),
        }
    }
}

pub async fn execute(
    cmd: UsersCommand,
    config: &Config,
    provider: &str,
    format: OutputFormat,
) -> Result<()> {
    let provider = open_provider(config, provider)?;

    match cmd.command {
        UsersSubcommand::List { limit } => {
            let users = provider.list_users(limit).await?;
            let rows: Vec<UserRow> = users.into_iter().map(UserRow::from).collect();
            print_output(&rows, format)
        }
        UsersSubcommand::Show { user_id } => {
            let user = provider.get_user(&user_id).await?;
            match format {
                OutputFormat::Table => print_output(&[UserRow::from(user)], format),
                _ => print_single(&user),
            }
        }
    }
}
