use thiserror::Error;

/// Hard-failure taxonomy for one pipeline run.
///
/// Speaker-resolution degradation is deliberately absent: it is a soft
/// failure carried in the resolver's result type, never an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Outbound speech-provider call errored or returned an unexpected shape.
    /// Reported to the failure callback, then re-raised for upstream retry.
    #[error("provider call failed: {0}")]
    ProviderCall(String),

    /// Provider succeeded but produced no usable words. Terminal and
    /// non-retryable; reported as `EMPTY` on the normal callback.
    #[error("provider returned an empty transcript")]
    EmptyTranscript,

    /// Adapter could not parse the provider's response shape at all.
    /// Treated like a provider-call failure.
    #[error("malformed native document: {0}")]
    MalformedDocument(String),

    /// Blob-store write failed
    #[error("storage write failed: {0}")]
    Storage(String),

    /// Callback POST failed
    #[error("callback delivery failed: {0}")]
    Callback(String),
}

impl PipelineError {
    /// Whether the failure callback should be notified before re-raising
    pub fn notifies_failure_callback(&self) -> bool {
        matches!(
            self,
            PipelineError::ProviderCall(_) | PipelineError::MalformedDocument(_)
        )
    }
}
