//! m365-collab - Microsoft 365 collaboration provider
//!
//! Teams channels and messaging, SharePoint documents, Outlook mail and
//! Planner tasks through Microsoft Graph, behind the `CollaborationProvider`
//! interface.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use api::client::GraphClient;
pub use config::{Config, Credentials};
pub use error::{Error, Result};
pub use provider::{CollaborationProvider, M365Provider, ProviderRegistry, UploadRequest};
