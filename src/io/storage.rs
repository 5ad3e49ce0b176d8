use reqwest::Client;
use tracing::info;

use crate::error::PipelineError;
use crate::models::TranscriptDocument;
use crate::providers::send_with_retry;

/// Object-storage seam. The pipeline only ever writes one document per job,
/// keyed `<job_id>_final_.json`, and never updates it in place.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    async fn put_document(
        &self,
        key: &str,
        document: &TranscriptDocument,
    ) -> Result<(), PipelineError>;
}

/// Blob key for a job's final document
pub fn document_key(job_id: &str) -> String {
    format!("{job_id}_final_.json")
}

/// Blob store backed by an S3-compatible HTTP endpoint (request signing is
/// handled by the gateway in front of it)
pub struct HttpBlobStore {
    client: Client,
    endpoint: String,
    bucket: String,
}

impl HttpBlobStore {
    pub fn new(client: Client, endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            bucket: bucket.into(),
        }
    }
}

impl BlobStore for HttpBlobStore {
    async fn put_document(
        &self,
        key: &str,
        document: &TranscriptDocument,
    ) -> Result<(), PipelineError> {
        let body = serde_json::to_vec(document)
            .map_err(|e| PipelineError::Storage(format!("serialize document: {e}")))?;
        let url = format!("{}/{}/{}", self.endpoint, self.bucket, key);

        let response = send_with_retry(
            self.client
                .put(&url)
                .header("content-type", "application/json")
                .header("x-meetscribe-created", chrono::Utc::now().to_rfc3339())
                .body(body),
        )
        .await
        .map_err(|e| PipelineError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PipelineError::Storage(format!(
                "blob write to {key} returned {}",
                response.status()
            )));
        }

        info!(key, "document persisted");
        Ok(())
    }
}
