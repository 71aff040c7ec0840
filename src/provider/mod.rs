//! Uniform collaboration interface and the providers that implement it.
//!
//! Orchestrators look a provider up by name in a [`ProviderRegistry`] and
//! talk to it only through [`CollaborationProvider`].

mod m365;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Channel, Document, DocumentRef, Message, PostReceipt, Task, User};

pub use m365::M365Provider;

/// Parameters of an upload into a document library
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub name: String,
    pub content: Vec<u8>,
    pub folder_path: Option<String>,
    pub site_id: Option<String>,
    /// Overrides the configured overwrite policy
    pub overwrite: Option<bool>,
}

impl UploadRequest {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            folder_path: None,
            site_id: None,
            overwrite: None,
        }
    }

    pub fn folder(mut self, folder_path: impl Into<String>) -> Self {
        self.folder_path = Some(folder_path.into());
        self
    }

    pub fn site(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(overwrite);
        self
    }
}

#[async_trait]
pub trait CollaborationProvider: Send + Sync {
    /// Registry key of the provider
    fn name(&self) -> &'static str;

    async fn list_users(&self, limit: usize) -> Result<Vec<User>>;

    /// Look a user up by id or principal name
    async fn get_user(&self, user_id: &str) -> Result<User>;

    /// Channels of one team, or of every reachable team when `team_id` is `None`
    async fn list_channels(&self, team_id: Option<&str>) -> Result<Vec<Channel>>;

    async fn get_messages(
        &self,
        channel_id: &str,
        limit: usize,
        team_id: Option<&str>,
    ) -> Result<Vec<Message>>;

    async fn post_message(
        &self,
        channel: &str,
        message: &str,
        title: Option<&str>,
    ) -> Result<PostReceipt>;

    async fn list_documents(
        &self,
        folder_path: Option<&str>,
        site_id: Option<&str>,
    ) -> Result<Vec<Document>>;

    async fn upload_document(&self, upload: UploadRequest) -> Result<Document>;

    async fn download_document(
        &self,
        document: &DocumentRef,
        site_id: Option<&str>,
    ) -> Result<Vec<u8>>;

    async fn list_tasks(&self, plan_id: Option<&str>) -> Result<Vec<Task>>;

    async fn send_email(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
        from_user: Option<&str>,
    ) -> Result<()>;
}

pub type ProviderFactory = fn(&Config) -> Result<Box<dyn CollaborationProvider>>;

/// Name -> factory table for collaboration providers
pub struct ProviderRegistry {
    factories: BTreeMap<String, ProviderFactory>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with the built-in providers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(M365Provider::NAME, create_m365);
        registry
    }

    pub fn register(&mut self, name: &str, factory: ProviderFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Instantiate a provider by name
    pub fn create(&self, name: &str, config: &Config) -> Result<Box<dyn CollaborationProvider>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            Error::Config(format!(
                "Unknown provider '{}'. Available providers: {}",
                name,
                self.names().join(", ")
            ))
        })?;
        factory(config)
    }
}

fn create_m365(config: &Config) -> Result<Box<dyn CollaborationProvider>> {
    Ok(Box::new(M365Provider::from_config(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_register_m365() {
        assert_eq!(ProviderRegistry::with_defaults().names(), vec!["m365"]);
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let registry = ProviderRegistry::with_defaults();
        match registry.create("slack", &Config::default()) {
            Err(Error::Config(msg)) => assert!(msg.contains("m365")),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("slack should not be registered"),
        }
    }

    #[test]
    fn test_upload_request_builder() {
        let upload = UploadRequest::new("a.txt", "hello")
            .folder("Reports")
            .site("site-1")
            .overwrite(false);
        assert_eq!(upload.content, b"hello".to_vec());
        assert_eq!(upload.folder_path.as_deref(), Some("Reports"));
        assert_eq!(upload.overwrite, Some(false));
    }
}
