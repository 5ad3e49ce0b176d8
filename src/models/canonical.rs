use serde::{Deserialize, Serialize};

/// The canonical transcript document produced by the pipeline.
///
/// This is the only durable artifact: one document per job, serialized to
/// blob storage under `<job_id>_final_.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptDocument {
    /// Concatenation of all recognized words across the call
    pub full_text: String,
    /// Time-ordered speaker segments
    pub segments: Vec<Segment>,
    /// Number of distinct normalized speaker indices observed
    pub speaker_count: usize,
}

impl TranscriptDocument {
    /// Total number of word items across all segments
    pub fn item_count(&self) -> usize {
        self.segments.iter().map(|s| s.items.len()).sum()
    }

    /// Distinct speaker labels in first-appearance order
    pub fn speaker_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if !labels.contains(&segment.speaker_label.as_str()) {
                labels.push(&segment.speaker_label);
            }
        }
        labels
    }
}

/// A maximal time span of the transcript attributed to one speaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Start of the segment in seconds from call start
    pub start_time: f64,
    /// End of the segment in seconds from call start
    pub end_time: f64,
    /// Normalized speaker label of the form `spk_<n>`
    pub speaker_label: String,
    /// Human-resolved display name, attached by the annotator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
    /// Words spoken within this segment, in chronological order
    pub items: Vec<WordItem>,
}

impl Segment {
    /// Duration of this segment in seconds
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

/// A single recognized word with timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordItem {
    pub start_time: f64,
    pub end_time: f64,
    /// Rendered token, punctuation already merged into the word
    pub content: String,
    /// Same normalization as the owning segment; kept for diagnostics
    pub speaker_label: String,
    /// Stripped by the annotator: naming is a segment-level concept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
}

/// A timestamped speaker-name event from the meeting-bot timeline.
///
/// Flat, unordered, duplicates by name expected. Read-only input to the
/// speaker-identity resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerActivityEvent {
    /// Seconds from call start
    pub timestamp: f64,
    /// Display name reported by the bot
    #[serde(rename = "name")]
    pub speaker_name: String,
    /// Identifier of the call/bot session this event belongs to
    pub external_id: String,
}

/// One resolved label-to-name entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerNameEntry {
    /// Normalized label of the form `spk_<n>`
    pub label: String,
    /// Best-guess display name ("Unknown" when evidence was inconclusive)
    pub name: String,
    /// "yes" for the speaker with the greatest total speaking time
    pub is_primary: String,
}

/// The resolver's output: at most one entry per normalized label,
/// produced fresh per job and never shared across jobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerNameMapping {
    pub entries: Vec<SpeakerNameEntry>,
}

impl SpeakerNameMapping {
    /// Look up the resolved name for a label
    pub fn name_for(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(start: f64, end: f64, content: &str, label: &str) -> WordItem {
        WordItem {
            start_time: start,
            end_time: end,
            content: content.to_string(),
            speaker_label: label.to_string(),
            speaker_name: None,
        }
    }

    #[test]
    fn test_speaker_labels_first_appearance_order() {
        let doc = TranscriptDocument {
            full_text: "a b c".to_string(),
            segments: vec![
                Segment {
                    start_time: 0.0,
                    end_time: 1.0,
                    speaker_label: "spk_1".to_string(),
                    speaker_name: None,
                    items: vec![word(0.0, 1.0, "a", "spk_1")],
                },
                Segment {
                    start_time: 1.0,
                    end_time: 2.0,
                    speaker_label: "spk_0".to_string(),
                    speaker_name: None,
                    items: vec![word(1.0, 2.0, "b", "spk_0")],
                },
                Segment {
                    start_time: 2.0,
                    end_time: 3.0,
                    speaker_label: "spk_1".to_string(),
                    speaker_name: None,
                    items: vec![word(2.0, 3.0, "c", "spk_1")],
                },
            ],
            speaker_count: 2,
        };

        assert_eq!(doc.speaker_labels(), vec!["spk_1", "spk_0"]);
        assert_eq!(doc.item_count(), 3);
    }

    #[test]
    fn test_mapping_lookup() {
        let mapping = SpeakerNameMapping {
            entries: vec![SpeakerNameEntry {
                label: "spk_0".to_string(),
                name: "Alice".to_string(),
                is_primary: "yes".to_string(),
            }],
        };

        assert_eq!(mapping.name_for("spk_0"), Some("Alice"));
        assert_eq!(mapping.name_for("spk_1"), None);
    }

    #[test]
    fn test_word_item_name_omitted_from_json() {
        let item = word(0.0, 0.5, "hello", "spk_0");
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("speaker_name"));
    }

    #[test]
    fn test_document_file_round_trip() {
        let doc = TranscriptDocument {
            full_text: "hi there".to_string(),
            segments: vec![Segment {
                start_time: 0.0,
                end_time: 2.0,
                speaker_label: "spk_0".to_string(),
                speaker_name: Some("Alice".to_string()),
                items: vec![word(0.0, 1.0, "hi", "spk_0"), word(1.0, 2.0, "there", "spk_0")],
            }],
            speaker_count: 1,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job-1_final_.json");
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let loaded: TranscriptDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.full_text, doc.full_text);
        assert_eq!(loaded.segments.len(), 1);
        assert_eq!(loaded.segments[0].speaker_name.as_deref(), Some("Alice"));
        assert_eq!(loaded.item_count(), 2);
    }
}
