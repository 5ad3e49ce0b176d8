use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::models::{AzureFileList, AzureSubmission, AzureTranscriptionStatus};
use crate::providers::http::send_with_retry;

/// Client for the Azure Speech batch transcription API.
///
/// Submission is asynchronous: Azure accepts the job and notifies a webhook
/// when the transcription is ready, after which the result is fetched
/// through the transcription's file listing.
pub struct AzureClient {
    client: Client,
    endpoint: String,
    key: String,
}

/// A finished transcription fetched from Azure
#[derive(Debug)]
pub struct AzureResult {
    /// The display name the submission carried (our job id)
    pub job_id: String,
    /// Raw transcript JSON, ready for the adapter
    pub transcript_json: Option<String>,
}

impl AzureClient {
    pub fn new(client: Client, endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            key: key.into(),
        }
    }

    /// Submit a transcription with a fixed locale
    pub async fn submit_manual(
        &self,
        source_url: &str,
        job_id: &str,
        locale: &str,
    ) -> Result<AzureSubmission> {
        let body = json!({
            "contentUrls": [source_url],
            "properties": self.diarization_properties(None),
            "locale": locale,
            "displayName": job_id,
        });
        self.submit(body).await
    }

    /// Submit a transcription that identifies the locale among candidates
    pub async fn submit_detect_language(
        &self,
        source_url: &str,
        job_id: &str,
        candidate_locales: &[String],
    ) -> Result<AzureSubmission> {
        let locale = candidate_locales
            .first()
            .context("detect-language submission needs at least one candidate locale")?;
        let body = json!({
            "contentUrls": [source_url],
            "properties": self.diarization_properties(Some(candidate_locales)),
            "locale": locale,
            "displayName": job_id,
        });
        self.submit(body).await
    }

    fn diarization_properties(&self, candidate_locales: Option<&[String]>) -> Value {
        let mut properties = json!({
            "diarizationEnabled": true,
            "diarization": {
                "speakers": { "minCount": 1, "maxCount": 6 }
            },
            "wordLevelTimestampsEnabled": true,
            "punctuationMode": "DictatedAndAutomatic",
            "profanityFilterMode": "None",
        });
        if let Some(locales) = candidate_locales {
            properties["languageIdentification"] = json!({ "candidateLocales": locales });
        }
        properties
    }

    async fn submit(&self, body: Value) -> Result<AzureSubmission> {
        let url = format!("{}/transcriptions", self.endpoint);
        debug!("submitting azure transcription");

        let response = send_with_retry(
            self.client
                .post(&url)
                .header("Ocp-Apim-Subscription-Key", &self.key)
                .json(&body),
        )
        .await
        .context("Failed to submit Azure transcription")?;

        let text = response
            .text()
            .await
            .context("Failed to read Azure submission response")?;
        serde_json::from_str(&text)
            .with_context(|| format!("Unexpected Azure submission response: {text}"))
    }

    /// Fetch a finished transcription's result JSON.
    ///
    /// `transcription_url` is the `self` link Azure handed back at submit
    /// time. Returns `transcript_json: None` while the provider is still
    /// running (no `Transcription` file in the listing yet).
    pub async fn fetch_result(&self, transcription_url: &str) -> Result<AzureResult> {
        let status: AzureTranscriptionStatus = self
            .get_json(transcription_url)
            .await
            .context("Failed to fetch Azure transcription status")?;

        let files: AzureFileList = self
            .get_json(&status.links.files)
            .await
            .context("Failed to fetch Azure file listing")?;

        let mut transcript_json = None;
        for file in files.values.iter().filter(|f| f.is_transcription()) {
            let response = send_with_retry(self.client.get(&file.links.content_url))
                .await
                .context("Failed to download Azure transcript")?;
            transcript_json = Some(
                response
                    .text()
                    .await
                    .context("Failed to read Azure transcript body")?,
            );
        }

        Ok(AzureResult {
            job_id: status.display_name,
            transcript_json,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = send_with_retry(
            self.client
                .get(url)
                .header("Ocp-Apim-Subscription-Key", &self.key),
        )
        .await?;

        if !response.status().is_success() {
            anyhow::bail!("Azure error: {}", response.status());
        }

        response.json().await.context("Failed to parse Azure response")
    }
}
