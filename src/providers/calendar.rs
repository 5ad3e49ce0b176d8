use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::CalendarConfig;
use crate::providers::http::send_with_retry;

/// Client for Google Calendar push-notification channels.
///
/// Registers a watch on the user's primary calendar so event changes ping
/// our webhook; the access token is minted from the caller's refresh token
/// on every registration.
pub struct CalendarClient {
    client: Client,
    config: CalendarConfig,
}

/// Result of a watch registration
#[derive(Debug, Clone)]
pub struct WatchChannel {
    pub channel_id: String,
    /// Expiry timestamp in epoch milliseconds
    pub expiration: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Deserialize)]
struct WatchResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    expiration: Option<String>,
}

impl CalendarClient {
    pub fn new(client: Client, config: CalendarConfig) -> Self {
        Self { client, config }
    }

    /// Register a watch channel on the user's primary calendar
    pub async fn start_watch(&self, refresh_token: &str) -> Result<WatchChannel> {
        let (token, token_type) = self.refresh_access_token(refresh_token).await?;

        let channel_id = uuid::Uuid::new_v4().to_string();
        let body = json!({
            "id": channel_id,
            "token": self.config.google_token,
            "type": "web_hook",
            "address": self.config.event_ping_url,
            "params": { "ttl": "2592000" }
        });
        debug!(channel_id = %channel_id, "registering calendar watch");

        let response = send_with_retry(
            self.client
                .post("https://www.googleapis.com/calendar/v3/calendars/primary/events/watch")
                .header("Authorization", format!("{token_type} {token}"))
                .json(&body),
        )
        .await
        .context("Failed to register calendar watch")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Calendar watch error: {} - {}", status, text);
        }

        let watch: WatchResponse = response
            .json()
            .await
            .context("Failed to parse calendar watch response")?;

        Ok(WatchChannel {
            channel_id: watch.id,
            expiration: watch.expiration.unwrap_or_else(|| "1".to_string()),
        })
    }

    /// Exchange the refresh token for an access token
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<(String, String)> {
        let body = json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
            "client_id": self.config.google_client_id,
            "client_secret": self.config.google_secret,
        });

        let response = send_with_retry(
            self.client
                .post("https://oauth2.googleapis.com/token")
                .json(&body),
        )
        .await
        .context("Failed to refresh Google access token")?;

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Google token response")?;

        if token.access_token.is_empty() {
            anyhow::bail!("Google token refresh returned no access token");
        }

        Ok((token.access_token, token.token_type))
    }
}
