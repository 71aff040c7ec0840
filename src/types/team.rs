use serde::{Deserialize, Serialize};

/// Microsoft 365 group backing a team
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphGroup {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

/// Channel within a team
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphChannel {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub web_url: Option<String>,
}

/// Filter selecting groups that are provisioned as teams
pub const TEAM_GROUP_FILTER: &str = "resourceProvisioningOptions/Any(x:x eq 'Team')";
