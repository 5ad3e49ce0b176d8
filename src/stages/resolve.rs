use std::collections::HashMap;

use tracing::debug;

use crate::models::{
    SpeakerActivityEvent, SpeakerNameEntry, SpeakerNameMapping, TranscriptDocument,
};

/// Sentinel name for a segment with no nearby activity event
pub const UNKNOWN_NAME: &str = "Unknown";

/// Configuration for the speaker-identity resolver
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Minimum segment duration (seconds) for a segment to count as evidence
    pub min_segment_duration: f64,
    /// How many long segments to consider per speaker
    pub max_segments_per_speaker: usize,
    /// Half-width (seconds) of the window around a segment start within
    /// which an activity event matches
    pub match_window: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_segment_duration: 10.0,
            max_segments_per_speaker: 11,
            match_window: 4.0,
        }
    }
}

/// Outcome of speaker resolution.
///
/// Degradation is a first-class result rather than an error: the pipeline
/// continues with fallback display names either way.
#[derive(Debug, Clone)]
pub enum Resolution {
    Resolved(SpeakerNameMapping),
    /// Activity signal unavailable or unusable; mapping is empty
    Degraded { reason: String },
}

impl Resolution {
    /// The mapping to annotate with, empty when degraded
    pub fn mapping(&self) -> SpeakerNameMapping {
        match self {
            Resolution::Resolved(mapping) => mapping.clone(),
            Resolution::Degraded { .. } => SpeakerNameMapping::default(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Resolution::Degraded { .. })
    }
}

/// Map each normalized speaker label to a best-guess human name.
///
/// The activity timeline is coarse and imprecise, so resolution is a vote:
/// for each speaker, up to `max_segments_per_speaker` segments longer than
/// `min_segment_duration` are checked for an activity event within
/// `match_window` seconds of the segment start. The plurality name wins,
/// ties broken by first appearance during the tally. Short utterances are
/// skipped entirely as unreliable evidence.
///
/// Inputs are never mutated; the mapping is rebuilt fresh per job.
pub fn resolve_speakers(
    document: &TranscriptDocument,
    events: &[SpeakerActivityEvent],
    config: &ResolverConfig,
) -> Resolution {
    if events.is_empty() {
        return Resolution::Degraded {
            reason: "no activity events available".to_string(),
        };
    }

    let labels = document.speaker_labels();
    let mut entries = Vec::new();

    for label in &labels {
        let votes = collect_votes(document, label, events, config);
        if let Some(name) = plurality(&votes) {
            entries.push(SpeakerNameEntry {
                label: (*label).to_string(),
                name,
                is_primary: "no".to_string(),
            });
        }
    }

    if entries.is_empty() {
        return Resolution::Degraded {
            reason: "no speaker matched any activity event".to_string(),
        };
    }

    mark_primary(document, &mut entries);
    debug!(speakers = labels.len(), resolved = entries.len(), "speaker resolution complete");

    Resolution::Resolved(SpeakerNameMapping { entries })
}

/// Attribute a name to each long segment of one speaker
fn collect_votes(
    document: &TranscriptDocument,
    label: &str,
    events: &[SpeakerActivityEvent],
    config: &ResolverConfig,
) -> Vec<String> {
    let mut votes = Vec::new();

    for segment in document
        .segments
        .iter()
        .filter(|s| s.speaker_label == label && s.duration() > config.min_segment_duration)
        .take(config.max_segments_per_speaker)
    {
        let name = events
            .iter()
            .find(|e| (e.timestamp - segment.start_time).abs() <= config.match_window)
            .map(|e| e.speaker_name.clone())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());
        votes.push(name);
    }

    votes
}

/// Most frequent vote, ties broken by first appearance in the tally
fn plurality(votes: &[String]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for vote in votes {
        if !counts.contains_key(vote.as_str()) {
            order.push(vote);
        }
        *counts.entry(vote).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for name in order {
        let count = counts[name];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((name, count));
        }
    }

    best.map(|(name, _)| name.to_string())
}

/// Mark the speaker with the greatest total speaking time as primary
fn mark_primary(document: &TranscriptDocument, entries: &mut [SpeakerNameEntry]) {
    let mut talk_time: HashMap<&str, f64> = HashMap::new();
    for segment in &document.segments {
        *talk_time.entry(segment.speaker_label.as_str()).or_insert(0.0) += segment.duration();
    }

    let primary = entries
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            let ta = talk_time.get(a.label.as_str()).copied().unwrap_or(0.0);
            let tb = talk_time.get(b.label.as_str()).copied().unwrap_or(0.0);
            ta.total_cmp(&tb)
        })
        .map(|(i, _)| i);

    if let Some(i) = primary {
        entries[i].is_primary = "yes".to_string();
    }
}
