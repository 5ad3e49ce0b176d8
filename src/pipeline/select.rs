use crate::models::JobStatus;

/// Languages the fast provider (Deepgram) handles.
///
/// Hints match by exact code or by primary subtag (`en-GB` matches `en`).
pub const DEEPGRAM_LANGS: &[&str] = &[
    "da", "nl", "en", "en-US", "fr", "de", "hi", "it", "ja", "ko", "no", "pl", "pt", "pt-BR",
    "pt-PT", "es", "es-419", "ta", "sv",
];

/// Which provider and mode to invoke for a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChoice {
    /// Fast provider, detect-language mode
    DeepgramDetect,
    /// Fast provider pinned to one language code
    DeepgramFixed(String),
    /// Fallback provider with a manually chosen locale
    AzureManual(String),
    /// Fallback provider detecting among candidate locales
    AzureDetect(Vec<String>),
}

impl ProviderChoice {
    /// The status this choice reports on the done callback
    pub fn status(&self) -> JobStatus {
        match self {
            ProviderChoice::DeepgramDetect => JobStatus::DeepgramMulti,
            ProviderChoice::DeepgramFixed(_) => JobStatus::DeepgramSingle,
            ProviderChoice::AzureManual(_) => JobStatus::AzureSingle,
            ProviderChoice::AzureDetect(_) => JobStatus::AzureMulti,
        }
    }
}

/// Decide which speech provider to invoke for a set of language hints
pub fn select_provider(language_hints: &[String]) -> ProviderChoice {
    match language_hints {
        [] => ProviderChoice::DeepgramDetect,
        [hint] if supported(hint) => ProviderChoice::DeepgramFixed(deepgram_code(hint)),
        [hint] => ProviderChoice::AzureManual(hint.clone()),
        hints if hints.iter().all(|h| supported(h)) => ProviderChoice::DeepgramDetect,
        hints => ProviderChoice::AzureDetect(hints.to_vec()),
    }
}

fn supported(hint: &str) -> bool {
    DEEPGRAM_LANGS.contains(&hint) || DEEPGRAM_LANGS.contains(&primary_subtag(hint))
}

/// The code to send Deepgram: the hint itself when listed, otherwise its
/// primary subtag (which `supported` already vouched for)
fn deepgram_code(hint: &str) -> String {
    if DEEPGRAM_LANGS.contains(&hint) {
        hint.to_string()
    } else {
        primary_subtag(hint).to_string()
    }
}

fn primary_subtag(hint: &str) -> &str {
    hint.split('-').next().unwrap_or(hint)
}
