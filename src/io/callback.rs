use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::error::PipelineError;
use crate::models::JobStatus;
use crate::providers::send_with_retry;

/// Callback seam. Exactly one done POST fires per job outcome; hard
/// failures additionally notify the failure callback before re-raising.
/// All bodies are JSON.
#[allow(async_fn_in_trait)]
pub trait CallbackSink {
    /// POST `{job_id, status}` to the done callback
    async fn post_done(&self, job_id: &str, status: JobStatus) -> Result<(), PipelineError>;

    /// POST `{job_id, status: "failed", reason}` to the failure callback
    async fn post_failed(&self, job_id: &str, reason: &str) -> Result<(), PipelineError>;

    /// POST `{job_id, status, transcription_url}` to the created callback
    /// when an asynchronous provider submission has been accepted
    async fn post_created(
        &self,
        job_id: &str,
        status: JobStatus,
        transcription_url: &str,
    ) -> Result<(), PipelineError>;
}

/// Callback sink posting to the configured done/failed/created URLs
pub struct HttpCallback {
    client: Client,
    done_url: String,
    failed_url: String,
    created_url: String,
}

impl HttpCallback {
    pub fn new(
        client: Client,
        done_url: impl Into<String>,
        failed_url: impl Into<String>,
        created_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            done_url: done_url.into(),
            failed_url: failed_url.into(),
            created_url: created_url.into(),
        }
    }

    async fn post(&self, url: &str, body: serde_json::Value) -> Result<(), PipelineError> {
        let response = send_with_retry(self.client.post(url).json(&body))
            .await
            .map_err(|e| PipelineError::Callback(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Callback(format!(
                "callback to {url} returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

impl CallbackSink for HttpCallback {
    async fn post_done(&self, job_id: &str, status: JobStatus) -> Result<(), PipelineError> {
        info!(job_id, status = status.as_str(), "posting done callback");
        self.post(
            &self.done_url,
            json!({ "job_id": job_id, "status": status.as_str() }),
        )
        .await
    }

    async fn post_failed(&self, job_id: &str, reason: &str) -> Result<(), PipelineError> {
        info!(job_id, reason, "posting failure callback");
        self.post(
            &self.failed_url,
            json!({ "job_id": job_id, "status": "failed", "reason": reason }),
        )
        .await
    }

    async fn post_created(
        &self,
        job_id: &str,
        status: JobStatus,
        transcription_url: &str,
    ) -> Result<(), PipelineError> {
        info!(job_id, status = status.as_str(), "posting created callback");
        self.post(
            &self.created_url,
            json!({
                "job_id": job_id,
                "status": status.as_str(),
                "transcription_url": transcription_url,
            }),
        )
        .await
    }
}
