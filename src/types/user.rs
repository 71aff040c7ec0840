use serde::{Deserialize, Serialize};

/// Directory user from Microsoft Graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphUser {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub user_principal_name: Option<String>,
    pub mail: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
}

/// Fields requested when listing users
pub const USER_SELECT: &str = "id,displayName,userPrincipalName,mail,department";
