use serde::{Deserialize, Serialize};

/// Root response from the Deepgram pre-recorded transcription API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResponse {
    pub results: DeepgramResults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResults {
    pub channels: Vec<DeepgramChannel>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramChannel {
    pub alternatives: Vec<DeepgramAlternative>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramAlternative {
    pub words: Vec<DeepgramWord>,
    #[serde(default)]
    pub transcript: Option<String>,
}

/// A single word from Deepgram with diarization info
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramWord {
    /// The recognized text
    pub word: String,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
    /// Numeric speaker identifier, zero-based
    pub speaker: u32,
    /// Rendering with punctuation attached (if requested)
    #[serde(default)]
    pub punctuated_word: Option<String>,
}

impl DeepgramWord {
    /// The rendering to carry into the canonical document
    pub fn rendered(&self) -> &str {
        self.punctuated_word.as_deref().unwrap_or(&self.word)
    }
}

impl DeepgramResponse {
    /// All words from the first channel's first alternative
    pub fn words(&self) -> &[DeepgramWord] {
        self.results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.words.as_slice())
            .unwrap_or(&[])
    }

    /// Full transcript text of the first channel's first alternative
    pub fn transcript(&self) -> &str {
        self.results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .and_then(|a| a.transcript.as_deref())
            .unwrap_or("")
    }
}
