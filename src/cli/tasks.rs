use anyhow::Result;
use clap::{Args, Subcommand};
use m365_collab::{Config, M365Provider};
use serde::Serialize;
use tabled::Tabled;

use super::output::print_output;
use super::{open_provider, OutputFormat};

#[derive(Args, Debug)]
pub struct TasksCommand {
    #[command(subcommand)]
    pub command: TasksSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TasksSubcommand {
    /// List tasks in a Planner plan
    List {
        /// Plan ID
        #[arg(long)]
        plan: Option<String>,
    },

    /// List Planner plans owned by a group
    Plans {
        /// Group (team) ID
        group_id: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Due")]
    due: String,
}

#[derive(Debug, Serialize, Tabled)]
struct PlanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
}

pub async fn execute(
    cmd: TasksCommand,
    config: &Config,
    provider: &str,
    format: OutputFormat,
) -> Result<()> {
    match cmd.command {
        TasksSubcommand::List { plan } => {
            let provider = open_provider(config, provider)?;
            let tasks = provider.list_tasks(plan.as_deref()).await?;
            let rows: Vec<TaskRow> = tasks
                .into_iter()
                .map(|task| TaskRow {
                    id: task.id,
                    title: task.title,
                    status: task.status.as_str().to_string(),
                    due: task.due_date.unwrap_or_default(),
                })
                .collect();
            print_output(&rows, format)
        }
        TasksSubcommand::Plans { group_id } => {
            // Plans are specific to the Microsoft 365 provider
            let m365 = M365Provider::from_config(config)?;
            let plans = m365.list_plans(&group_id).await?;
            let rows: Vec<PlanRow> = plans
                .into_iter()
                .map(|plan| PlanRow {
                    id: plan.id.unwrap_or_default(),
                    title: plan.title.unwrap_or_default(),
                })
                .collect();
            print_output(&rows, format)
        }
    }
}
