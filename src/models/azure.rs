use serde::{Deserialize, Serialize};

/// Root of an Azure batch transcription result document.
///
/// Timing fields are ISO-8601 duration strings (`PT12.34S`); the adapter
/// converts them to seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureTranscript {
    pub combined_recognized_phrases: Vec<AzureCombinedPhrase>,
    pub recognized_phrases: Vec<AzurePhrase>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureCombinedPhrase {
    /// Display-form text of the whole channel
    pub display: String,
}

/// One recognized phrase with diarization attached
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzurePhrase {
    /// One-based speaker id assigned by Azure diarization
    pub speaker: u32,
    /// ISO-8601 duration from audio start to phrase start
    pub offset: String,
    /// ISO-8601 duration of the phrase
    pub duration: String,
    /// Recognition candidates, best first
    #[serde(rename = "nBest")]
    pub n_best: Vec<AzureNBest>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureNBest {
    /// Display form with punctuation and capitalization
    pub display: String,
    /// Lexical form, one token per recognized word
    pub lexical: String,
    pub words: Vec<AzureWord>,
}

/// Word-level timing within a phrase
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureWord {
    pub offset: String,
    pub duration: String,
}

/// Response to an Azure batch transcription submission.
///
/// The `self` link doubles as the success marker: a submission response
/// without it is a provider failure.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureSubmission {
    #[serde(rename = "self")]
    pub self_url: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// Transcription status document fetched from the `self` link
#[derive(Debug, Clone, Deserialize)]
pub struct AzureTranscriptionStatus {
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub links: AzureLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureLinks {
    pub files: String,
}

/// Listing of result files attached to a finished transcription
#[derive(Debug, Clone, Deserialize)]
pub struct AzureFileList {
    pub values: Vec<AzureFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureFile {
    #[serde(default)]
    pub kind: Option<String>,
    pub links: AzureFileLinks,
}

impl AzureFile {
    /// Whether this file holds the transcript itself
    pub fn is_transcription(&self) -> bool {
        self.kind.as_deref() == Some("Transcription")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AzureFileLinks {
    #[serde(rename = "contentUrl")]
    pub content_url: String,
}
