pub mod auth;
pub mod client;
pub mod webhook;

pub use auth::*;
pub use client::*;
pub use webhook::*;

// API scopes
pub const SCOPE_GRAPH: &str = "https://graph.microsoft.com/.default";

/// Teams scanned when listing channels without a team
pub const MAX_TEAMS_SCANNED: usize = 5;

/// Largest `$top` accepted by the users endpoint
pub const MAX_PAGE_SIZE: usize = 999;

/// Largest `$top` accepted by the channel messages endpoint
pub const MAX_MESSAGE_PAGE_SIZE: usize = 50;
