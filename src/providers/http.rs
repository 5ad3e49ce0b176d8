use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use tracing::warn;

/// Timeout applied to every outbound call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client all collaborators use
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Send a request, retrying once on a transport error.
///
/// HTTP error statuses are returned to the caller untouched; only
/// connect/timeout failures are worth a second attempt.
pub async fn send_with_retry(request: RequestBuilder) -> Result<Response> {
    let retry = request
        .try_clone()
        .context("Request body is not cloneable for retry")?;

    match request.send().await {
        Ok(response) => Ok(response),
        Err(first) => {
            warn!(error = %first, "outbound request failed, retrying once");
            retry
                .send()
                .await
                .with_context(|| format!("Request failed after retry (first error: {first})"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transport_error_is_retried_once_then_surfaced() {
        let client = build_client().unwrap();
        // Nothing listens on the discard port; both attempts are refused
        let error = send_with_retry(client.get("http://127.0.0.1:9/"))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("after retry"));
    }

    #[tokio::test]
    async fn test_json_bodies_are_retryable() {
        let client = build_client().unwrap();
        let request = client
            .post("http://127.0.0.1:9/")
            .json(&serde_json::json!({ "job_id": "j1" }));
        // A cloneable body must reach the retry path, not the clone failure
        let error = send_with_retry(request).await.unwrap_err();
        assert!(error.to_string().contains("after retry"));
    }
}
