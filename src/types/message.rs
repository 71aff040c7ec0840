use serde::{Deserialize, Serialize};

/// Message body as returned and accepted by Graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySet {
    pub user: Option<Identity>,
    pub application: Option<Identity>,
}

/// Channel message resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub created_date_time: Option<String>,
    pub body: Option<MessageBody>,
    pub from: Option<IdentitySet>,
    pub web_url: Option<String>,
}

impl ChatMessage {
    /// Display name of the posting user or application
    pub fn sender_name(&self) -> Option<&str> {
        let from = self.from.as_ref()?;
        display_name(&from.user).or_else(|| display_name(&from.application))
    }
}

fn display_name(identity: &Option<Identity>) -> Option<&str> {
    identity.as_ref()?.display_name.as_deref()
}

/// Body of `POST /teams/{id}/channels/{id}/messages`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: MessageBody,
}

/// Payload accepted by a Teams incoming webhook
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    Text {
        text: String,
    },
    MessageCard {
        #[serde(rename = "@type")]
        card_type: &'static str,
        summary: String,
        sections: Vec<CardSection>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSection {
    pub activity_title: String,
    pub text: String,
}

impl WebhookPayload {
    /// Plain text without a title, a titled MessageCard otherwise
    pub fn new(text: &str, title: Option<&str>) -> Self {
        match title {
            Some(title) => WebhookPayload::MessageCard {
                card_type: "MessageCard",
                summary: title.to_string(),
                sections: vec![CardSection {
                    activity_title: title.to_string(),
                    text: text.to_string(),
                }],
            },
            None => WebhookPayload::Text {
                text: text.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_webhook_payload_shapes() {
        let plain = serde_json::to_value(WebhookPayload::new("hi", None)).unwrap();
        assert_eq!(plain, json!({ "text": "hi" }));

        let card = serde_json::to_value(WebhookPayload::new("hi", Some("Deploy"))).unwrap();
        assert_eq!(
            card,
            json!({
                "@type": "MessageCard",
                "summary": "Deploy",
                "sections": [{ "activityTitle": "Deploy", "text": "hi" }]
            })
        );
    }

    #[test]
    fn test_sender_name_prefers_user() {
        let msg: ChatMessage = serde_json::from_value(json!({
            "id": "1",
            "from": {
                "user": { "id": "u1", "displayName": "Ada" },
                "application": { "id": "a1", "displayName": "Bot" }
            }
        }))
        .unwrap();
        assert_eq!(msg.sender_name(), Some("Ada"));

        let bot: ChatMessage = serde_json::from_value(json!({
            "id": "2",
            "from": { "user": null, "application": { "displayName": "Bot" } }
        }))
        .unwrap();
        assert_eq!(bot.sender_name(), Some("Bot"));

        let unnamed_user: ChatMessage = serde_json::from_value(json!({
            "id": "3",
            "from": {
                "user": { "id": "u2", "displayName": null },
                "application": { "displayName": "Bot" }
            }
        }))
        .unwrap();
        assert_eq!(unnamed_user.sender_name(), Some("Bot"));
    }
}
