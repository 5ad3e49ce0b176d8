use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::models::SpeakerActivityEvent;
use crate::providers::http::send_with_retry;

/// Fetches the meeting bot's speaker-activity timeline for a call.
///
/// The timeline is weak evidence only; callers treat any failure here as a
/// soft degradation, never a job failure.
pub struct ActivityClient {
    client: Client,
    base_url: String,
}

impl ActivityClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetch activity events for the call identified by `external_id`
    pub async fn fetch_events(&self, external_id: &str) -> Result<Vec<SpeakerActivityEvent>> {
        let url = format!("{}/calls/{}/speakers", self.base_url, external_id);
        debug!(external_id, "fetching speaker activity timeline");

        let response = send_with_retry(self.client.get(&url))
            .await
            .context("Failed to fetch activity timeline")?;

        if !response.status().is_success() {
            anyhow::bail!("Activity API error: {}", response.status());
        }

        response
            .json()
            .await
            .context("Failed to parse activity timeline response")
    }
}
