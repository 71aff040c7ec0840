use reqwest::Client;

use super::SCOPE_GRAPH;
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::types::{AccessToken, TokenResponse};

/// Request an app-only Graph token with the client-credentials grant
///
/// Transport failures and rejected credentials both surface as
/// `Error::Auth`.
pub async fn gen_token(
    http: &Client,
    login_url: &str,
    credentials: &Credentials,
) -> Result<AccessToken> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        login_url.trim_end_matches('/'),
        credentials.tenant_id
    );

    let res = http
        .post(&url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", SCOPE_GRAPH),
        ])
        .send()
        .await
        .map_err(|e| Error::Auth(format!("Token request failed: {}", e)))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| Error::Auth(format!("Failed to read token response: {}", e)))?;
    let token_data: Option<TokenResponse> = serde_json::from_str(&body).ok();

    if !status.is_success() {
        let reason = token_data
            .and_then(|t| t.error_description.or(t.error))
            .unwrap_or(body);
        return Err(Error::Auth(format!(
            "Failed to acquire token: {} - {}",
            status,
            reason.trim()
        )));
    }

    let token_data =
        token_data.ok_or_else(|| Error::Auth("Malformed token response".to_string()))?;
    let value = token_data
        .access_token
        .ok_or_else(|| Error::Auth("No access_token in response".to_string()))?;
    let expires_in = token_data.expires_in.unwrap_or(3600);

    tracing::info!(tenant = %credentials.tenant_id, expires_in, "Acquired Graph access token");

    Ok(AccessToken::new(value, expires_in))
}
