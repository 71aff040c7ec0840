//! Provider-neutral records returned by `CollaborationProvider`.
//!
//! Records are plain values built per call from the Graph wire types; the
//! connector never stores them.

use serde::{Deserialize, Serialize};

use super::{ChatMessage, DriveItem, GraphChannel, GraphUser, PlannerTask};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl From<GraphUser> for User {
    fn from(user: GraphUser) -> Self {
        Self {
            id: user.id.unwrap_or_default(),
            display_name: user.display_name.unwrap_or_default(),
            email: user.mail.or(user.user_principal_name),
            department: user.department,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub team_id: String,
    pub team_name: Option<String>,
}

impl Channel {
    pub fn from_graph(channel: GraphChannel, team_id: &str, team_name: Option<&str>) -> Self {
        Self {
            id: channel.id.unwrap_or_default(),
            name: channel.display_name.unwrap_or_default(),
            description: channel.description,
            team_id: team_id.to_string(),
            team_name: team_name.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub sender: String,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    pub fn from_graph(message: ChatMessage, channel_id: &str) -> Self {
        let sender = message.sender_name().unwrap_or("Unknown").to_string();
        Self {
            id: message.id.unwrap_or_default(),
            channel_id: channel_id.to_string(),
            sender,
            content: message
                .body
                .and_then(|body| body.content)
                .unwrap_or_default(),
            timestamp: message.created_date_time.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub path: String,
    pub web_url: Option<String>,
    pub size: Option<i64>,
    pub is_folder: bool,
}

impl Document {
    pub fn from_graph(item: DriveItem, path: &str) -> Self {
        let is_folder = item.is_folder();
        Self {
            id: item.id.unwrap_or_default(),
            name: item.name.unwrap_or_default(),
            path: path.to_string(),
            web_url: item.web_url,
            size: item.size,
            is_folder,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Complete,
}

impl TaskStatus {
    /// Planner only reports 0, 50 and 100; anything partial is in progress
    pub fn from_percent(percent: Option<i32>) -> Self {
        match percent {
            Some(100) => TaskStatus::Complete,
            None | Some(0) => TaskStatus::NotStarted,
            Some(_) => TaskStatus::InProgress,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Complete => "complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub plan_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub due_date: Option<String>,
}

impl Task {
    pub fn from_graph(task: PlannerTask, plan_id: &str) -> Self {
        Self {
            id: task.id.unwrap_or_default(),
            plan_id: task.plan_id.unwrap_or_else(|| plan_id.to_string()),
            title: task.title.unwrap_or_default(),
            status: TaskStatus::from_percent(task.percent_complete),
            due_date: task.due_date_time,
        }
    }
}

/// How a channel post reached Teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum PostReceipt {
    Webhook { channel: String },
    Graph { message_id: String },
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_email_falls_back_to_upn() {
        let user = User::from(GraphUser {
            id: Some("u1".into()),
            display_name: Some("Ada".into()),
            user_principal_name: Some("ada@contoso.onmicrosoft.com".into()),
            ..Default::default()
        });
        assert_eq!(user.email.as_deref(), Some("ada@contoso.onmicrosoft.com"));
    }

    #[test]
    fn test_task_status_from_percent() {
        assert_eq!(TaskStatus::from_percent(Some(100)), TaskStatus::Complete);
        assert_eq!(TaskStatus::from_percent(Some(50)), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_percent(Some(0)), TaskStatus::NotStarted);
        assert_eq!(TaskStatus::from_percent(None), TaskStatus::NotStarted);
    }

    #[test]
    fn test_message_without_sender_is_unknown() {
        let msg: ChatMessage = serde_json::from_value(json!({
            "id": "m1",
            "createdDateTime": "2024-05-01T10:00:00Z",
            "body": { "contentType": "html", "content": "<p>hi</p>" }
        }))
        .unwrap();
        let record = Message::from_graph(msg, "c1");
        assert_eq!(record.sender, "Unknown");
        assert_eq!(record.content, "<p>hi</p>");
        assert_eq!(record.channel_id, "c1");
    }

    #[test]
    fn test_post_receipt_serialization() {
        let receipt = PostReceipt::Graph {
            message_id: "42".into(),
        };
        assert_eq!(
            serde_json::to_value(&receipt).unwrap(),
            json!({ "via": "graph", "message_id": "42" })
        );
    }
}
