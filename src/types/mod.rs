mod drive;
mod mail;
mod message;
mod planner;
mod records;
mod team;
mod user;

pub use drive::*;
pub use mail::*;
pub use message::*;
pub use planner::*;
pub use records::*;
pub use team::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn get_epoch_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Access token with expiration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub value: String,
    /// Expiry as seconds since the Unix epoch
    pub expires: u64,
    /// Lifetime granted at issue, in seconds
    #[serde(default)]
    pub lifetime: u64,
}

impl AccessToken {
    /// Token issued now that lives for `expires_in` seconds
    pub fn new(value: impl Into<String>, expires_in: u64) -> Self {
        Self {
            value: value.into(),
            expires: get_epoch_s() + expires_in,
            lifetime: expires_in,
        }
    }

    /// True when the token is still usable `skew_s` seconds from now
    ///
    /// The skew is capped at half the token's lifetime, so short-lived
    /// tokens are still reused for the first half of their life.
    pub fn is_fresh(&self, skew_s: u64) -> bool {
        let skew = match self.lifetime {
            0 => skew_s,
            lifetime => skew_s.min(lifetime / 2),
        };
        self.expires > get_epoch_s() + skew
    }
}

/// Token endpoint response for the client-credentials grant
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// OData collection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(rename = "@odata.context")]
    pub context: Option<String>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_freshness() {
        assert!(AccessToken::new("t", 3600).is_fresh(60));

        let near_expiry = AccessToken {
            value: "t".to_string(),
            expires: get_epoch_s() + 30,
            lifetime: 3600,
        };
        assert!(!near_expiry.is_fresh(60));
    }

    #[test]
    fn test_short_lived_token_caps_skew() {
        let short = AccessToken::new("t", 45);
        assert!(short.is_fresh(60));

        let half_spent = AccessToken {
            value: "t".to_string(),
            expires: get_epoch_s() + 20,
            lifetime: 45,
        };
        assert!(!half_spent.is_fresh(60));
    }

    #[test]
    fn test_collection_without_value_is_empty() {
        let users: Collection<GraphUser> =
            serde_json::from_str(r#"{"@odata.context":"ctx"}"#).unwrap();
        assert!(users.value.is_empty());
        assert!(users.next_link.is_none());
    }
}
