use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{gen_token, MAX_MESSAGE_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::cache::TokenCache;
use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::types::*;

/// Percent-encode a single path segment (ids, UPNs)
fn seg(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Microsoft Graph API client
///
/// Holds one app-only token in memory and refreshes it on demand.
pub struct GraphClient {
    http: Client,
    graph_url: String,
    login_url: String,
    credentials: Credentials,
    tokens: TokenCache,
    default_site: Option<String>,
}

impl GraphClient {
    /// Create a new Graph client
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        // Redirects stay enabled: drive content downloads answer with a 302 to
        // a pre-authenticated URL.
        let http = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout))
            .build()?;

        Ok(Self {
            http,
            graph_url: config.api.graph_url.trim_end_matches('/').to_string(),
            login_url: config.api.login_url.trim_end_matches('/').to_string(),
            credentials,
            tokens: TokenCache::new(),
            default_site: config.sharepoint.site_id.clone(),
        })
    }

    /// Underlying HTTP client, shared with the webhook poster
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Get the cached token, acquiring a new one when absent or near expiry
    pub async fn access_token(&self) -> Result<AccessToken> {
        self.tokens
            .get_or_refresh(|| gen_token(&self.http, &self.login_url, &self.credentials))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.graph_url, path)
    }

    async fn auth_headers(&self) -> Result<HeaderMap> {
        let token = self.access_token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", token.value))
                .map_err(|_| Error::Auth("Token is not a valid header value".to_string()))?,
        );
        Ok(headers)
    }

    /// Pass successful responses through, map the rest onto `Error`
    async fn check(res: Response) -> Result<Response> {
        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status();
            let body = res.text().await?;
            let err = Error::from_status(status, &body);
            tracing::debug!(status = status.as_u16(), code = err.code_str(), "Graph request failed");
            Err(err)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        tracing::debug!(method = "GET", url, "Graph request");
        let headers = self.auth_headers().await?;
        let res = self.http.get(url).headers(headers).query(query).send().await?;
        let body = Self::check(res).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "Graph request");
        let headers = self.auth_headers().await?;
        let res = self
            .http
            .request(method, &url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        let body = Self::check(res).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Follow `@odata.nextLink` until `limit` items are collected
    async fn collect_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        limit: usize,
    ) -> Result<Vec<T>> {
        let mut items: Vec<T> = Vec::new();
        let mut page: Collection<T> = self.get_json(&self.url(path), query).await?;

        loop {
            items.extend(page.value);
            if items.len() >= limit {
                items.truncate(limit);
                break;
            }
            match page.next_link {
                Some(next) => page = self.get_json(&next, &[]).await?,
                None => break,
            }
        }

        Ok(items)
    }

    // ==================== USERS ====================

    /// List directory users in directory order
    pub async fn list_users(&self, limit: usize) -> Result<Vec<GraphUser>> {
        if limit == 0 {
            return Err(Error::Validation("limit must be at least 1".to_string()));
        }
        let top = limit.min(MAX_PAGE_SIZE);
        self.collect_pages(
            "/users",
            &[("$top", top.to_string()), ("$select", USER_SELECT.to_string())],
            limit,
        )
        .await
    }

    /// Get a user by object id or user principal name
    pub async fn get_user(&self, user_id: &str) -> Result<GraphUser> {
        if user_id.trim().is_empty() {
            return Err(Error::Validation("user_id must not be empty".to_string()));
        }
        let url = self.url(&format!("/users/{}", seg(user_id.trim())));
        let user: GraphUser = self
            .get_json(&url, &[("$select", USER_SELECT.to_string())])
            .await
            .map_err(|e| match e {
                Error::NotFound(_) => Error::NotFound(format!("User not found: {}", user_id)),
                other => other,
            })?;
        Ok(user)
    }

    // ==================== TEAMS ====================

    /// List groups provisioned as teams
    pub async fn list_teams(&self) -> Result<Vec<GraphGroup>> {
        let groups: Collection<GraphGroup> = self
            .get_json(
                &self.url("/groups"),
                &[
                    ("$filter", TEAM_GROUP_FILTER.to_string()),
                    ("$select", "id,displayName".to_string()),
                ],
            )
            .await?;
        Ok(groups.value)
    }

    /// List channels in a team
    pub async fn list_channels(&self, team_id: &str) -> Result<Vec<GraphChannel>> {
        let url = self.url(&format!("/teams/{}/channels", seg(team_id)));
        let channels: Collection<GraphChannel> = self.get_json(&url, &[]).await?;
        Ok(channels.value)
    }

    /// Get recent messages from a team channel
    pub async fn list_channel_messages(
        &self,
        team_id: &str,
        channel_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let path = format!(
            "/teams/{}/channels/{}/messages",
            seg(team_id),
            seg(channel_id)
        );
        let top = limit.min(MAX_MESSAGE_PAGE_SIZE);
        self.collect_pages(&path, &[("$top", top.to_string())], limit)
            .await
    }

    /// Post a message into a team channel
    pub async fn post_channel_message(
        &self,
        team_id: &str,
        channel_id: &str,
        text: &str,
        subject: Option<&str>,
    ) -> Result<ChatMessage> {
        let path = format!(
            "/teams/{}/channels/{}/messages",
            seg(team_id),
            seg(channel_id)
        );
        let body = NewChatMessage {
            subject: subject.map(str::to_string),
            body: MessageBody {
                content_type: Some("text".to_string()),
                content: Some(text.to_string()),
            },
        };
        self.send_json(Method::POST, &path, &body).await
    }

    // ==================== SHAREPOINT ====================

    /// Search SharePoint sites visible to the app
    pub async fn list_sites(&self) -> Result<Vec<Site>> {
        let sites: Collection<Site> = self
            .get_json(&self.url("/sites"), &[("search", "*".to_string())])
            .await?;
        Ok(sites.value)
    }

    /// Configured site, else the first site the app can see
    pub async fn default_site_id(&self) -> Result<Option<String>> {
        if let Some(site) = &self.default_site {
            return Ok(Some(site.clone()));
        }
        let sites = self.list_sites().await?;
        Ok(sites.into_iter().find_map(|site| site.id))
    }

    /// List the children of a folder in the site's default document library
    pub async fn list_drive_children(
        &self,
        site_id: &str,
        folder: Option<&str>,
    ) -> Result<Vec<DriveItem>> {
        let path = match folder.map(|f| f.trim_matches('/')) {
            Some(f) if !f.is_empty() && f != "root" => format!(
                "/sites/{}/drive/root:/{}:/children",
                seg(site_id),
                encode_path(f)
            ),
            _ => format!("/sites/{}/drive/root/children", seg(site_id)),
        };
        let items: Collection<DriveItem> = self.get_json(&self.url(&path), &[]).await?;
        Ok(items.value)
    }

    /// Upload file content to a library path
    ///
    /// With `overwrite` off, an existing item makes Graph answer 409, which
    /// surfaces as `Error::Conflict`.
    pub async fn upload_content(
        &self,
        site_id: &str,
        path: &str,
        content: Vec<u8>,
        overwrite: bool,
    ) -> Result<DriveItem> {
        let url = self.url(&format!(
            "/sites/{}/drive/root:/{}:/content",
            seg(site_id),
            encode_path(path)
        ));
        let behavior = if overwrite { "replace" } else { "fail" };
        tracing::debug!(method = "PUT", url = %url, bytes = content.len(), behavior, "Graph upload");

        let mut headers = self.auth_headers().await?;
        headers.insert(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("application/octet-stream"),
        );

        let res = self
            .http
            .put(&url)
            .headers(headers)
            .query(&[("@microsoft.graph.conflictBehavior", behavior)])
            .body(content)
            .send()
            .await?;

        let body = Self::check(res)
            .await
            .map_err(|e| match e {
                Error::Conflict(msg) => {
                    Error::Conflict(format!("{} already exists ({})", path, msg))
                }
                other => other,
            })?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Download file content by path or item id
    pub async fn download_content(&self, site_id: &str, document: &DocumentRef) -> Result<Vec<u8>> {
        let url = match document {
            DocumentRef::Path(path) => self.url(&format!(
                "/sites/{}/drive/root:/{}:/content",
                seg(site_id),
                encode_path(path)
            )),
            DocumentRef::Id(id) => self.url(&format!(
                "/sites/{}/drive/items/{}/content",
                seg(site_id),
                seg(id)
            )),
        };
        tracing::debug!(method = "GET", url = %url, "Graph download");

        let headers = self.auth_headers().await?;
        let res = self.http.get(&url).headers(headers).send().await?;
        let bytes = Self::check(res).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    // ==================== PLANNER ====================

    /// List plans owned by a group
    pub async fn list_plans(&self, group_id: &str) -> Result<Vec<PlannerPlan>> {
        let url = self.url(&format!("/groups/{}/planner/plans", seg(group_id)));
        let plans: Collection<PlannerPlan> = self.get_json(&url, &[]).await?;
        Ok(plans.value)
    }

    /// List tasks in a plan
    pub async fn list_plan_tasks(&self, plan_id: &str) -> Result<Vec<PlannerTask>> {
        let url = self.url(&format!("/planner/plans/{}/tasks", seg(plan_id)));
        let tasks: Collection<PlannerTask> = self.get_json(&url, &[]).await?;
        Ok(tasks.value)
    }

    // ==================== MAIL ====================

    /// Send mail on behalf of a user
    ///
    /// Graph answers 202 with an empty body; any error status is reported as
    /// `Error::Api`, since a rejected message is not a missing resource.
    pub async fn send_mail(&self, from_user: &str, request: &SendMailRequest) -> Result<()> {
        let url = self.url(&format!("/users/{}/sendMail", seg(from_user)));
        tracing::debug!(method = "POST", url = %url, "Graph sendMail");

        let headers = self.auth_headers().await?;
        let res = self
            .http
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await?;

        if res.status().is_success() {
            Ok(())
        } else {
            let status = res.status();
            let body = res.text().await?;
            Err(match status {
                StatusCode::UNAUTHORIZED => Error::from_status(status, &body),
                _ => Error::api(status, &body),
            })
        }
    }
}
