use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::join_all;

use super::{CollaborationProvider, UploadRequest};
use crate::api::{GraphClient, WebhookClient, MAX_TEAMS_SCANNED};
use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::types::*;

/// Microsoft 365 collaboration provider backed by Microsoft Graph
pub struct M365Provider {
    graph: GraphClient,
    webhook: WebhookClient,
    webhooks: BTreeMap<String, String>,
    overwrite: bool,
}

impl M365Provider {
    pub const NAME: &'static str = "m365";

    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        let graph = GraphClient::new(config, credentials)?;
        let webhook = WebhookClient::new(graph.http().clone());
        Ok(Self {
            graph,
            webhook,
            webhooks: config.teams.webhooks.clone(),
            overwrite: config.sharepoint.overwrite,
        })
    }

    /// Build from a loaded config, reading credentials from the environment
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config, Credentials::from_env()?)
    }

    pub fn graph(&self) -> &GraphClient {
        &self.graph
    }

    /// Names of channels reachable through a configured webhook
    pub fn webhook_channels(&self) -> Vec<&str> {
        self.webhooks.keys().map(String::as_str).collect()
    }

    /// List Planner plans owned by a group
    pub async fn list_plans(&self, group_id: &str) -> Result<Vec<PlannerPlan>> {
        self.graph.list_plans(group_id).await
    }

    async fn resolve_site(&self, site_id: Option<&str>) -> Result<Option<String>> {
        match site_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(site) => Ok(Some(site.to_string())),
            None => self.graph.default_site_id().await,
        }
    }

    async fn require_site(&self, site_id: Option<&str>) -> Result<String> {
        self.resolve_site(site_id)
            .await?
            .ok_or_else(|| Error::NotFound("No SharePoint sites available".to_string()))
    }

    async fn channels_of(&self, team: &GraphGroup) -> Result<Vec<Channel>> {
        let team_id = team.id.as_deref().unwrap_or_default();
        let channels = self.graph.list_channels(team_id).await?;
        Ok(channels
            .into_iter()
            .map(|ch| Channel::from_graph(ch, team_id, team.display_name.as_deref()))
            .collect())
    }
}

#[async_trait]
impl CollaborationProvider for M365Provider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn list_users(&self, limit: usize) -> Result<Vec<User>> {
        let users = self.graph.list_users(limit).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, user_id: &str) -> Result<User> {
        let user = self.graph.get_user(user_id).await?;
        if user.id.is_none() {
            return Err(Error::NotFound(format!("User not found: {}", user_id)));
        }
        Ok(User::from(user))
    }

    async fn list_channels(&self, team_id: Option<&str>) -> Result<Vec<Channel>> {
        if let Some(team_id) = team_id.filter(|t| !t.trim().is_empty()) {
            let channels = self.graph.list_channels(team_id).await?;
            return Ok(channels
                .into_iter()
                .map(|ch| Channel::from_graph(ch, team_id, None))
                .collect());
        }

        let teams: Vec<GraphGroup> = self
            .graph
            .list_teams()
            .await?
            .into_iter()
            .filter(|team| team.id.is_some())
            .take(MAX_TEAMS_SCANNED)
            .collect();

        let results = join_all(teams.iter().map(|team| self.channels_of(team))).await;

        let mut all_channels = Vec::new();
        for (team, result) in teams.iter().zip(results) {
            match result {
                Ok(channels) => all_channels.extend(channels),
                Err(e) => {
                    tracing::warn!(team = ?team.id, code = e.code_str(), error = %e, "Skipping team whose channels cannot be read")
                }
            }
        }
        Ok(all_channels)
    }

    async fn get_messages(
        &self,
        channel_id: &str,
        limit: usize,
        team_id: Option<&str>,
    ) -> Result<Vec<Message>> {
        let team_id = team_id
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::Validation("team_id is required for M365 channel messages".to_string())
            })?;
        if channel_id.trim().is_empty() {
            return Err(Error::Validation("channel_id must not be empty".to_string()));
        }

        let messages = self
            .graph
            .list_channel_messages(team_id, channel_id, limit)
            .await?;
        Ok(messages
            .into_iter()
            .map(|msg| Message::from_graph(msg, channel_id))
            .collect())
    }

    async fn post_message(
        &self,
        channel: &str,
        message: &str,
        title: Option<&str>,
    ) -> Result<PostReceipt> {
        if message.trim().is_empty() {
            return Err(Error::Validation("message must not be empty".to_string()));
        }

        if let Some(url) = self.webhooks.get(channel) {
            self.webhook.post(url, message, title).await?;
            tracing::info!(channel, "Posted message via webhook");
            return Ok(PostReceipt::Webhook {
                channel: channel.to_string(),
            });
        }

        let (team_id, channel_id) = match channel.split_once('/') {
            Some((team, ch)) if !team.is_empty() && !ch.is_empty() => (team, ch),
            _ => {
                return Err(Error::Config(format!(
                    "No webhook configured for channel '{}'. Available channels: {:?}",
                    channel,
                    self.webhook_channels()
                )))
            }
        };

        // Token failures stay authentication errors; only a denied post means
        // the app lacks the channel permission.
        self.graph.access_token().await?;
        match self
            .graph
            .post_channel_message(team_id, channel_id, message, title)
            .await
        {
            Ok(posted) => {
                tracing::info!(team_id, channel_id, "Posted message via Graph");
                Ok(PostReceipt::Graph {
                    message_id: posted.id.unwrap_or_default(),
                })
            }
            Err(e @ (Error::Auth(_) | Error::Api { status: 403, .. })) => {
                Err(Error::Config(format!(
                    "No webhook configured for channel '{}' and the app may not post via Graph: {}",
                    channel, e
                )))
            }
            Err(e) => Err(e),
        }
    }

    async fn list_documents(
        &self,
        folder_path: Option<&str>,
        site_id: Option<&str>,
    ) -> Result<Vec<Document>> {
        let Some(site_id) = self.resolve_site(site_id).await? else {
            return Ok(Vec::new());
        };

        let items = self.graph.list_drive_children(&site_id, folder_path).await?;
        let path = folder_path
            .map(|f| f.trim_matches('/'))
            .filter(|f| !f.is_empty() && *f != "root")
            .unwrap_or("/");
        Ok(items
            .into_iter()
            .map(|item| Document::from_graph(item, path))
            .collect())
    }

    async fn upload_document(&self, upload: UploadRequest) -> Result<Document> {
        if upload.name.trim().is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }
        let site_id = self.require_site(upload.site_id.as_deref()).await?;
        let path = library_path(upload.folder_path.as_deref(), &upload.name);
        let overwrite = upload.overwrite.unwrap_or(self.overwrite);

        let item = self
            .graph
            .upload_content(&site_id, &path, upload.content, overwrite)
            .await?;

        let mut document = Document::from_graph(item, &path);
        if document.name.is_empty() {
            document.name = upload.name;
        }
        Ok(document)
    }

    async fn download_document(
        &self,
        document: &DocumentRef,
        site_id: Option<&str>,
    ) -> Result<Vec<u8>> {
        if document.is_empty() {
            return Err(Error::Validation(
                "document path or item id must not be empty".to_string(),
            ));
        }
        let site_id = self.require_site(site_id).await?;
        self.graph.download_content(&site_id, document).await
    }

    async fn list_tasks(&self, plan_id: Option<&str>) -> Result<Vec<Task>> {
        let Some(plan_id) = plan_id.filter(|p| !p.trim().is_empty()) else {
            return Ok(Vec::new());
        };
        let tasks = self.graph.list_plan_tasks(plan_id).await?;
        Ok(tasks
            .into_iter()
            .map(|task| Task::from_graph(task, plan_id))
            .collect())
    }

    async fn send_email(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
        from_user: Option<&str>,
    ) -> Result<()> {
        let recipients: Vec<&str> = to
            .iter()
            .map(|addr| addr.trim())
            .filter(|addr| !addr.is_empty())
            .collect();
        if recipients.is_empty() {
            return Err(Error::Validation(
                "at least one recipient is required".to_string(),
            ));
        }

        let sender = match from_user.filter(|u| !u.trim().is_empty()) {
            Some(user) => user.to_string(),
            None => self
                .graph
                .list_users(1)
                .await?
                .into_iter()
                .find_map(|user| user.id)
                .ok_or_else(|| {
                    Error::NotFound("No users available to send email from".to_string())
                })?,
        };

        let request = SendMailRequest::text(&recipients, subject, body);
        self.graph.send_mail(&sender, &request).await?;
        tracing::info!(recipients = recipients.len(), "Sent email");
        Ok(())
    }
}
