use reqwest::StatusCode;
use serde::Deserialize;

/// Errors raised by the Graph client and the M365 provider
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credential or token failure
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response from Graph or a webhook endpoint
    #[error("Graph API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// A required parameter was missing or invalid
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Missing environment, webhook or permission
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upload collided with an existing item
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serde JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Map a failed Graph response onto the error taxonomy
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = graph_error_message(body);
        match status {
            StatusCode::UNAUTHORIZED if message.is_empty() => {
                Error::Auth(format!("HTTP {}", status.as_u16()))
            }
            StatusCode::UNAUTHORIZED => {
                Error::Auth(format!("HTTP {}: {}", status.as_u16(), message))
            }
            StatusCode::NOT_FOUND => Error::NotFound(message),
            StatusCode::CONFLICT => Error::Conflict(message),
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// `Error::Api` with the Graph error envelope reduced to its message
    pub fn api(status: StatusCode, body: &str) -> Self {
        Error::Api {
            status: status.as_u16(),
            message: graph_error_message(body),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::NotFound(_) => Some(404),
            Error::Conflict(_) => Some(409),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short machine-readable code
    pub fn code_str(&self) -> &'static str {
        match self {
            Error::Auth(_) => "auth_failed",
            Error::Api { .. } => "api_error",
            Error::NotFound(_) => "not_found",
            Error::Validation(_) => "invalid_input",
            Error::Config(_) => "config_error",
            Error::Conflict(_) => "conflict",
            Error::Http(_) => "upstream_error",
            Error::Json(_) => "parse_error",
            Error::Io(_) => "io_error",
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GraphErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

/// Reduce a Graph error envelope to `code: message`; other bodies pass through
fn graph_error_message(body: &str) -> String {
    match serde_json::from_str::<GraphErrorBody>(body) {
        Ok(GraphErrorBody {
            error: GraphErrorDetail { code, message },
        }) => match (code, message) {
            (Some(code), Some(message)) => format!("{}: {}", code, message),
            (Some(code), None) => code,
            (None, Some(message)) => message,
            (None, None) => body.trim().to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}
