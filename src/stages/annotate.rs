use crate::models::{SpeakerNameMapping, TranscriptDocument};
use crate::stages::resolve::UNKNOWN_NAME;

/// Apply resolved names onto segments.
///
/// A segment gets the mapping's name when one exists and isn't the
/// "Unknown" sentinel; otherwise the deterministic fallback
/// `Speaker <n+1>` derived from the label's numeric suffix. Word-level
/// names are stripped: naming lives on segments only.
pub fn annotate_names(document: &mut TranscriptDocument, mapping: &SpeakerNameMapping) {
    for segment in &mut document.segments {
        let resolved = mapping
            .name_for(&segment.speaker_label)
            .filter(|name| *name != UNKNOWN_NAME);

        segment.speaker_name = Some(match resolved {
            Some(name) => name.to_string(),
            None => fallback_name(&segment.speaker_label),
        });

        for item in &mut segment.items {
            item.speaker_name = None;
        }
    }
}

/// Display name for an unresolved label: `spk_3` becomes `Speaker 4`.
/// Labels outside the `spk_<n>` space are shown as-is.
fn fallback_name(label: &str) -> String {
    label
        .strip_prefix("spk_")
        .and_then(|suffix| suffix.parse::<u32>().ok())
        .map(|n| format!("Speaker {}", n + 1))
        .unwrap_or_else(|| label.to_string())
}
