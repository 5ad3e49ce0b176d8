use std::collections::HashMap;

use crate::adapters::IntermediateTranscript;
use crate::models::{Segment, TranscriptDocument, WordItem};

/// Label assigned to any raw speaker id missing from the normalization map.
/// Unreachable when the map is built from the same segment list, but the
/// pipeline stays total rather than failing.
pub const UNMAPPED_SPEAKER_LABEL: &str = "spk_100";

/// Result of the merge stage
#[derive(Debug)]
pub struct MergeResult {
    pub document: TranscriptDocument,
    /// Segments collapsed into their predecessor
    pub segments_merged: usize,
}

/// Collapse adjacent same-speaker segments and normalize speaker labels.
///
/// One left-to-right pass merges each segment into its predecessor when the
/// raw speaker ids match (items extended, end time advanced). Raw ids are
/// then mapped to `spk_<n>` in first-appearance order; the map is local to
/// this document and never shared across jobs.
///
/// Guarantees: segment count never increases, item count is conserved,
/// chronological order is preserved, and merging is idempotent.
pub fn merge_segments(intermediate: IntermediateTranscript) -> MergeResult {
    let input_count = intermediate.segments.len();

    // Pass 1: collapse adjacent same-speaker segments
    let mut merged: Vec<(u32, f64, f64, Vec<crate::adapters::RawWord>)> = Vec::new();
    for segment in intermediate.segments {
        match merged.last_mut() {
            Some((speaker, _, end, items)) if *speaker == segment.speaker => {
                items.extend(segment.items);
                *end = segment.end_time;
            }
            _ => merged.push((
                segment.speaker,
                segment.start_time,
                segment.end_time,
                segment.items,
            )),
        }
    }

    // Pass 2: first-appearance normalization, one ordered map, O(1) lookup
    let mut label_index: HashMap<u32, usize> = HashMap::new();
    for (speaker, ..) in &merged {
        let next = label_index.len();
        label_index.entry(*speaker).or_insert(next);
    }

    let speaker_count = label_index.len();
    let segments: Vec<Segment> = merged
        .into_iter()
        .map(|(speaker, start, end, items)| {
            let label = normalize_label(speaker, &label_index);
            Segment {
                start_time: start,
                end_time: end,
                speaker_label: label.clone(),
                speaker_name: None,
                items: items
                    .into_iter()
                    .map(|w| WordItem {
                        start_time: w.start_time,
                        end_time: w.end_time,
                        content: w.content,
                        speaker_label: label.clone(),
                        speaker_name: None,
                    })
                    .collect(),
            }
        })
        .collect();

    let segments_merged = input_count - segments.len();

    MergeResult {
        document: TranscriptDocument {
            full_text: intermediate.full_text,
            segments,
            speaker_count,
        },
        segments_merged,
    }
}

fn normalize_label(speaker: u32, label_index: &HashMap<u32, usize>) -> String {
    match label_index.get(&speaker) {
        Some(index) => format!("spk_{index}"),
        None => UNMAPPED_SPEAKER_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{RawSegment, RawWord};

    fn raw_word(start: f64, end: f64, content: &str) -> RawWord {
        RawWord {
            start_time: start,
            end_time: end,
            content: content.to_string(),
        }
    }

    fn raw_segment(speaker: u32, start: f64, end: f64, words: &[&str]) -> RawSegment {
        let step = (end - start) / words.len().max(1) as f64;
        RawSegment {
            speaker,
            start_time: start,
            end_time: end,
            items: words
                .iter()
                .enumerate()
                .map(|(i, w)| raw_word(start + i as f64 * step, start + (i + 1) as f64 * step, w))
                .collect(),
        }
    }

    fn intermediate(segments: Vec<RawSegment>) -> IntermediateTranscript {
        IntermediateTranscript {
            full_text: "test".to_string(),
            segments,
        }
    }

    #[test]
    fn test_collapses_adjacent_same_speaker() {
        let result = merge_segments(intermediate(vec![
            raw_segment(1, 0.0, 2.0, &["a", "b"]),
            raw_segment(1, 2.0, 4.0, &["c"]),
            raw_segment(2, 4.0, 6.0, &["d"]),
        ]));

        assert_eq!(result.segments_merged, 1);
        assert_eq!(result.document.segments.len(), 2);

        let first = &result.document.segments[0];
        assert_eq!(first.start_time, 0.0);
        assert_eq!(first.end_time, 4.0);
        assert_eq!(first.items.len(), 3);
    }

    #[test]
    fn test_item_count_conserved() {
        let input = intermediate(vec![
            raw_segment(3, 0.0, 1.0, &["a"]),
            raw_segment(3, 1.0, 2.0, &["b", "c"]),
            raw_segment(1, 2.0, 3.0, &["d"]),
            raw_segment(3, 3.0, 4.0, &["e", "f", "g"]),
        ]);
        let before = input.item_count();

        let result = merge_segments(input);
        assert_eq!(result.document.item_count(), before);
    }

    #[test]
    fn test_first_appearance_labeling() {
        // Raw ids arrive out of numeric order; first appearance wins
        let result = merge_segments(intermediate(vec![
            raw_segment(7, 0.0, 1.0, &["a"]),
            raw_segment(2, 1.0, 2.0, &["b"]),
            raw_segment(7, 2.0, 3.0, &["c"]),
        ]));

        let labels: Vec<&str> = result
            .document
            .segments
            .iter()
            .map(|s| s.speaker_label.as_str())
            .collect();
        assert_eq!(labels, vec!["spk_0", "spk_1", "spk_0"]);
        assert_eq!(result.document.speaker_count, 2);

        // Word labels match their owning segment
        for segment in &result.document.segments {
            for item in &segment.items {
                assert_eq!(item.speaker_label, segment.speaker_label);
            }
        }
    }

    #[test]
    fn test_merge_idempotent() {
        let once = merge_segments(intermediate(vec![
            raw_segment(0, 0.0, 1.0, &["a"]),
            raw_segment(0, 1.0, 2.0, &["b"]),
            raw_segment(1, 2.0, 3.0, &["c"]),
            raw_segment(0, 3.0, 4.0, &["d"]),
        ]));

        // Re-run the merge over the already-merged output
        let re_input = IntermediateTranscript {
            full_text: once.document.full_text.clone(),
            segments: once
                .document
                .segments
                .iter()
                .map(|s| RawSegment {
                    // Labels are already distinct per adjacent segment;
                    // use the index of the label's suffix as the raw id
                    speaker: s.speaker_label[4..].parse().unwrap(),
                    start_time: s.start_time,
                    end_time: s.end_time,
                    items: s
                        .items
                        .iter()
                        .map(|w| raw_word(w.start_time, w.end_time, &w.content))
                        .collect(),
                })
                .collect(),
        };

        let twice = merge_segments(re_input);
        assert_eq!(twice.segments_merged, 0);
        assert_eq!(twice.document.segments.len(), once.document.segments.len());
        assert_eq!(twice.document.item_count(), once.document.item_count());
    }

    #[test]
    fn test_empty_input() {
        let result = merge_segments(intermediate(vec![]));
        assert!(result.document.segments.is_empty());
        assert_eq!(result.document.speaker_count, 0);
    }
}
