use serde::{Deserialize, Serialize};

/// A transcription job as handed over by the HTTP front door
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionJob {
    /// Job identifier, also the external bot/call identifier
    pub job_id: String,
    /// Location of the recording to transcribe
    pub source_url: String,
    /// Caller-supplied language hints (BCP-47 codes), possibly empty
    #[serde(default)]
    pub language_hints: Vec<String>,
}

/// Terminal outcome reported on the done callback.
///
/// The string forms are a fixed contract with downstream consumers:
/// extend, never rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "DEEPGRAM_SINGLE")]
    DeepgramSingle,
    #[serde(rename = "DEEPGRAM_MULTI")]
    DeepgramMulti,
    #[serde(rename = "AZURE_SINGLE")]
    AzureSingle,
    #[serde(rename = "AZURE_MULTI")]
    AzureMulti,
    #[serde(rename = "EMPTY")]
    Empty,
    #[serde(rename = "failed")]
    Failed,
    /// Azure completion job: transcript fetched and persisted
    #[serde(rename = "Complete")]
    Complete,
    /// Azure completion job: provider has not finished yet
    #[serde(rename = "Running")]
    Running,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::DeepgramSingle => "DEEPGRAM_SINGLE",
            JobStatus::DeepgramMulti => "DEEPGRAM_MULTI",
            JobStatus::AzureSingle => "AZURE_SINGLE",
            JobStatus::AzureMulti => "AZURE_MULTI",
            JobStatus::Empty => "EMPTY",
            JobStatus::Failed => "failed",
            JobStatus::Complete => "Complete",
            JobStatus::Running => "Running",
        }
    }
}

/// Per-job pipeline state, advanced strictly forward.
///
/// `Failed` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Received,
    ProviderSelected,
    ProviderCalled,
    Normalizing,
    ResolvingSpeakers,
    Persisted,
    CallbackSent,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Received => "RECEIVED",
            JobState::ProviderSelected => "PROVIDER_SELECTED",
            JobState::ProviderCalled => "PROVIDER_CALLED",
            JobState::Normalizing => "NORMALIZING",
            JobState::ResolvingSpeakers => "RESOLVING_SPEAKERS",
            JobState::Persisted => "PERSISTED",
            JobState::CallbackSent => "CALLBACK_SENT",
            JobState::Failed => "FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_forms() {
        assert_eq!(
            serde_json::to_string(&JobStatus::DeepgramSingle).unwrap(),
            "\"DEEPGRAM_SINGLE\""
        );
        assert_eq!(serde_json::to_string(&JobStatus::Failed).unwrap(), "\"failed\"");
        assert_eq!(serde_json::to_string(&JobStatus::Empty).unwrap(), "\"EMPTY\"");
    }

    #[test]
    fn test_job_defaults_empty_hints() {
        let job: TranscriptionJob = serde_json::from_str(
            r#"{"job_id": "j1", "source_url": "https://example/audio.wav"}"#,
        )
        .unwrap();
        assert!(job.language_hints.is_empty());
    }

    #[test]
    fn test_state_wire_forms() {
        assert_eq!(JobState::Received.as_str(), "RECEIVED");
        assert_eq!(JobState::CallbackSent.as_str(), "CALLBACK_SENT");
        assert_eq!(JobState::Failed.as_str(), "FAILED");
    }
}
