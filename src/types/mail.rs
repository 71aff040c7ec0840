use serde::{Deserialize, Serialize};

/// Email address with optional name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAddress {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Recipient wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email_address: EmailAddress,
}

impl Recipient {
    pub fn new(address: &str) -> Self {
        Self {
            email_address: EmailAddress {
                address: address.trim().to_string(),
                name: None,
            },
        }
    }
}

/// Email body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub content_type: String,
    pub content: String,
}

/// Body of `POST /users/{id}/sendMail`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest {
    pub message: OutgoingMail,
    pub save_to_sent_items: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMail {
    pub subject: String,
    pub body: ItemBody,
    pub to_recipients: Vec<Recipient>,
}

impl SendMailRequest {
    /// Plain-text mail saved to the sender's Sent Items
    pub fn text<S: AsRef<str>>(to: &[S], subject: &str, body: &str) -> Self {
        Self {
            message: OutgoingMail {
                subject: subject.to_string(),
                body: ItemBody {
                    content_type: "Text".to_string(),
                    content: body.to_string(),
                },
                to_recipients: to.iter().map(|addr| Recipient::new(addr.as_ref())).collect(),
            },
            save_to_sent_items: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_send_mail_request_wire_shape() {
        let request = SendMailRequest::text(&["a@contoso.com", " b@contoso.com "], "Hi", "Body");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "message": {
                    "subject": "Hi",
                    "body": { "contentType": "Text", "content": "Body" },
                    "toRecipients": [
                        { "emailAddress": { "address": "a@contoso.com" } },
                        { "emailAddress": { "address": "b@contoso.com" } }
                    ]
                },
                "saveToSentItems": true
            })
        );
    }
}
