use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::providers::http::send_with_retry;

/// Client for the Deepgram pre-recorded transcription API.
///
/// The API key is not held directly: a token service issues short-lived
/// tokens, fetched once per transcription call.
pub struct DeepgramClient {
    client: Client,
    token_url: String,
}

impl DeepgramClient {
    pub fn new(client: Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }

    /// Transcribe a recording by URL. With `language` the model is pinned to
    /// one language; without it Deepgram detects the language itself.
    ///
    /// Returns the raw response body for the adapter to parse.
    pub async fn transcribe(&self, source_url: &str, language: Option<&str>) -> Result<String> {
        let token = self.fetch_token().await?;

        let common = "diarize=true&punctuate=true&utterances=true&numerals=true&model=general-enhanced";
        let url = match language {
            Some(lang) => format!("https://api.deepgram.com/v1/listen?language={lang}&{common}"),
            None => format!("https://api.deepgram.com/v1/listen?detect_language=true&{common}"),
        };
        debug!(language = ?language, "calling deepgram");

        let response = send_with_retry(
            self.client
                .post(&url)
                .header("Authorization", format!("Token {token}"))
                .json(&json!({ "url": source_url })),
        )
        .await
        .context("Failed to send request to Deepgram")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Deepgram error: {} - {}", status, body);
        }

        response
            .text()
            .await
            .context("Failed to read Deepgram response body")
    }

    async fn fetch_token(&self) -> Result<String> {
        let response = send_with_retry(self.client.get(&self.token_url))
            .await
            .context("Failed to fetch Deepgram token")?;

        if !response.status().is_success() {
            anyhow::bail!("Deepgram token service error: {}", response.status());
        }

        let token: String = response
            .json()
            .await
            .context("Failed to parse Deepgram token response")?;
        Ok(token)
    }
}
