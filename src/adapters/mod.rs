pub mod azure;
pub mod deepgram;

pub use azure::adapt_azure;
pub use deepgram::adapt_deepgram;

use crate::error::PipelineError;

/// Which provider's native format a document is in.
///
/// The orchestrator supplies this explicitly; adapters never sniff shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFormat {
    /// Segmented-diarization format (Azure batch transcription)
    Azure,
    /// Word-stream format (Deepgram pre-recorded)
    Deepgram,
}

/// A word with timing, before speaker labels are normalized
#[derive(Debug, Clone)]
pub struct RawWord {
    pub start_time: f64,
    pub end_time: f64,
    pub content: String,
}

/// A provider-native speaker segment carrying the raw speaker id.
///
/// Raw ids live in whatever space the provider uses (Azure is 1-based,
/// Deepgram 0-based); the merge stage maps them to `spk_<n>`.
#[derive(Debug, Clone)]
pub struct RawSegment {
    pub speaker: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub items: Vec<RawWord>,
}

/// Adapter output: canonical-shaped but pre-merge, pre-normalization
#[derive(Debug, Clone)]
pub struct IntermediateTranscript {
    pub full_text: String,
    pub segments: Vec<RawSegment>,
}

impl IntermediateTranscript {
    pub fn item_count(&self) -> usize {
        self.segments.iter().map(|s| s.items.len()).sum()
    }
}

/// Convert a provider-native JSON document into the intermediate shape
pub fn adapt(format: ProviderFormat, json: &str) -> Result<IntermediateTranscript, PipelineError> {
    match format {
        ProviderFormat::Azure => adapt_azure(json),
        ProviderFormat::Deepgram => adapt_deepgram(json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_rejects_wrong_shape() {
        // A Deepgram body fed through the Azure adapter is malformed, not empty
        let deepgram_json = r#"{"results": {"channels": []}}"#;
        let err = adapt(ProviderFormat::Azure, deepgram_json).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedDocument(_)));
    }
}
