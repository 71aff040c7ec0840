use anyhow::Result;
use m365_collab::Config;
use serde::Serialize;
use tabled::Tabled;

use super::output::{print_info, print_output};
use super::OutputFormat;

#[derive(Debug, Serialize, Tabled)]
struct WebhookRow {
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Host")]
    host: String,
}

/// Webhook URLs embed their credentials, so only the host is shown
fn host_of(url: &str) -> String {
    url.split("://")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or_default()
        .to_string()
}

pub fn execute(config: &Config, format: OutputFormat) -> Result<()> {
    if config.teams.webhooks.is_empty() {
        print_info("No webhooks configured. Set M365_TEAMS_WEBHOOKS=name=url,...");
        return Ok(());
    }

    let rows: Vec<WebhookRow> = config
        .teams
        .webhooks
        .iter()
        .map(|(channel, url)| WebhookRow {
            channel: channel.clone(),
            host: host_of(url),
        })
        .collect();
    print_output(&rows, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://contoso.webhook.office.com/webhookb2/abc@def"),
            "contoso.webhook.office.com"
        );
        assert_eq!(host_of("not a url"), "");
    }
}
