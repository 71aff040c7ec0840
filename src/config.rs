use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_TENANT_ID: &str = "M365_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "M365_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "M365_CLIENT_SECRET";
pub const ENV_TEAMS_WEBHOOKS: &str = "M365_TEAMS_WEBHOOKS";
pub const ENV_GRAPH_URL: &str = "M365_GRAPH_URL";
pub const ENV_LOGIN_URL: &str = "M365_LOGIN_URL";
pub const ENV_SITE_ID: &str = "M365_SITE_ID";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sharepoint: SharePointConfig,
    #[serde(default)]
    pub teams: TeamsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Graph REST root, including the API version
    #[serde(default = "default_graph_url")]
    pub graph_url: String,
    /// Identity platform root used for token requests
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_graph_url() -> String {
    "https://graph.microsoft.com/v1.0".to_string()
}

fn default_login_url() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            graph_url: default_graph_url(),
            login_url: default_login_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharePointConfig {
    /// Site used when a call does not name one
    #[serde(default)]
    pub site_id: Option<String>,
    /// Replace existing items on upload
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SharePointConfig {
    fn default() -> Self {
        Self {
            site_id: None,
            overwrite: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamsConfig {
    /// Channel name -> incoming webhook URL
    #[serde(default)]
    pub webhooks: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
        }
    }
}

impl Config {
    /// Get the project directories
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "m365-collab", "m365-collab")
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load the config file (if any) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Apply `M365_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_GRAPH_URL) {
            self.api.graph_url = url;
        }
        if let Some(url) = non_empty(ENV_LOGIN_URL) {
            self.api.login_url = url;
        }
        if let Some(site) = non_empty(ENV_SITE_ID) {
            self.sharepoint.site_id = Some(site);
        }
        if let Some(raw) = non_empty(ENV_TEAMS_WEBHOOKS) {
            self.teams.webhooks.extend(parse_webhooks(&raw));
        }
    }
}

/// App registration used for the client-credentials flow
#[derive(Clone)]
pub struct Credentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read credentials from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials from a variable lookup; blank values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tenant_id = lookup(ENV_TENANT_ID).filter(|v| !v.trim().is_empty());
        let client_id = lookup(ENV_CLIENT_ID).filter(|v| !v.trim().is_empty());
        let client_secret = lookup(ENV_CLIENT_SECRET).filter(|v| !v.trim().is_empty());

        match (tenant_id, client_id, client_secret) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => Ok(Self {
                tenant_id,
                client_id,
                client_secret,
            }),
            (tenant_id, client_id, client_secret) => {
                let missing: Vec<&str> = [
                    (ENV_TENANT_ID, tenant_id.is_none()),
                    (ENV_CLIENT_ID, client_id.is_none()),
                    (ENV_CLIENT_SECRET, client_secret.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name)
                .collect();
                Err(Error::Config(format!(
                    "Missing required environment variables: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// Parse `name=url` pairs separated by commas
///
/// Pairs without `=` are skipped. Only the first `=` splits, so URLs keep
/// their query strings.
pub fn parse_webhooks(raw: &str) -> BTreeMap<String, String> {
    raw.split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, url)| (name.trim().to_string(), url.trim().to_string()))
        .filter(|(name, url)| !name.is_empty() && !url.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_webhooks() {
        let hooks = parse_webhooks(
            " general = https://hook/a?x=1 ,alerts=https://hook/b,broken,=https://hook/c",
        );
        assert_eq!(hooks.len(), 2);
        assert_eq!(hooks["general"], "https://hook/a?x=1");
        assert_eq!(hooks["alerts"], "https://hook/b");
    }

    #[test]
    fn test_credentials_all_present() {
        let creds = Credentials::from_lookup(lookup(&[
            (ENV_TENANT_ID, "tenant"),
            (ENV_CLIENT_ID, "client"),
            (ENV_CLIENT_SECRET, "secret"),
        ]))
        .unwrap();
        assert_eq!(creds.tenant_id, "tenant");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"secret\""));
    }

    #[test]
    fn test_credentials_missing_lists_names() {
        let err = Credentials::from_lookup(lookup(&[
            (ENV_TENANT_ID, "tenant"),
            (ENV_CLIENT_SECRET, "  "),
        ]))
        .unwrap_err();
        match err {
            Error::Config(msg) => {
                assert!(msg.contains(ENV_CLIENT_ID));
                assert!(msg.contains(ENV_CLIENT_SECRET));
                assert!(!msg.contains(ENV_TENANT_ID));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_env_webhooks_override_file() {
        let mut config = Config::default();
        config
            .teams
            .webhooks
            .insert("general".to_string(), "https://file/general".to_string());
        config
            .teams
            .webhooks
            .insert("alerts".to_string(), "https://file/alerts".to_string());

        config.apply_overrides(lookup(&[
            (ENV_TEAMS_WEBHOOKS, "general=https://env/general"),
            (ENV_SITE_ID, "site-1"),
        ]));

        assert_eq!(config.teams.webhooks["general"], "https://env/general");
        assert_eq!(config.teams.webhooks["alerts"], "https://file/alerts");
        assert_eq!(config.sharepoint.site_id.as_deref(), Some("site-1"));
        assert_eq!(config.api.graph_url, "https://graph.microsoft.com/v1.0");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
timeout = 5

[sharepoint]
overwrite = false

[teams.webhooks]
handoffs = "https://hook/handoffs"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api.timeout, 5);
        assert_eq!(config.api.login_url, "https://login.microsoftonline.com");
        assert!(!config.sharepoint.overwrite);
        assert_eq!(config.teams.webhooks["handoffs"], "https://hook/handoffs");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.sharepoint.overwrite);
        assert_eq!(config.output.default_format, "table");
    }
}
