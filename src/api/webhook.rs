use reqwest::Client;

use crate::error::{Error, Result};
use crate::types::WebhookPayload;

/// Poster for Teams incoming webhooks
///
/// Webhook URLs carry their own authorization, so no bearer token is sent.
#[derive(Clone)]
pub struct WebhookClient {
    http: Client,
}

impl WebhookClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Post a message, optionally as a titled MessageCard
    pub async fn post(&self, url: &str, text: &str, title: Option<&str>) -> Result<()> {
        let payload = WebhookPayload::new(text, title);
        tracing::debug!(titled = title.is_some(), "Posting to Teams webhook");

        let res = self.http.post(url).json(&payload).send().await?;

        if res.status().is_success() {
            Ok(())
        } else {
            let status = res.status();
            let body = res.text().await?;
            Err(Error::Api {
                status: status.as_u16(),
                message: format!("Webhook rejected message: {}", body.trim()),
            })
        }
    }
}
