use crate::adapters::{IntermediateTranscript, RawSegment, RawWord};
use crate::error::PipelineError;
use crate::models::{AzurePhrase, AzureTranscript};

/// Convert an Azure segmented-diarization document into the intermediate
/// shape.
///
/// Azure groups recognition into phrases that already carry a speaker id and
/// ISO-8601 offset/duration timing. Each phrase becomes one segment; the
/// merge stage collapses adjacent same-speaker phrases afterwards.
pub fn adapt_azure(json: &str) -> Result<IntermediateTranscript, PipelineError> {
    let transcript: AzureTranscript = serde_json::from_str(json)
        .map_err(|e| PipelineError::MalformedDocument(format!("azure transcript: {e}")))?;
    adapt_azure_transcript(&transcript)
}

/// Intermediate conversion over an already-parsed transcript
pub fn adapt_azure_transcript(
    transcript: &AzureTranscript,
) -> Result<IntermediateTranscript, PipelineError> {
    let full_text = transcript
        .combined_recognized_phrases
        .first()
        .map(|p| p.display.clone())
        .unwrap_or_default();

    if transcript.recognized_phrases.is_empty() || full_text.trim().is_empty() {
        return Err(PipelineError::EmptyTranscript);
    }

    let mut segments = Vec::with_capacity(transcript.recognized_phrases.len());
    for phrase in &transcript.recognized_phrases {
        segments.push(convert_phrase(phrase)?);
    }

    Ok(IntermediateTranscript { full_text, segments })
}

fn convert_phrase(phrase: &AzurePhrase) -> Result<RawSegment, PipelineError> {
    let start = parse_iso_duration(&phrase.offset)?;
    let end = start + parse_iso_duration(&phrase.duration)?;

    let best = phrase
        .n_best
        .first()
        .ok_or_else(|| PipelineError::MalformedDocument("phrase without nBest".to_string()))?;

    // The display form sometimes merges tokens differently than the timing
    // data expects; when the counts disagree, the lexical tokenization is the
    // one that lines up with the word-level timing entries.
    let display_tokens: Vec<&str> = best.display.split_whitespace().collect();
    let lexical_tokens: Vec<&str> = best.lexical.split_whitespace().collect();
    let tokens = if display_tokens.len() != lexical_tokens.len() {
        lexical_tokens
    } else {
        display_tokens
    };

    let mut items = Vec::with_capacity(tokens.len());
    for (idx, word) in best.words.iter().enumerate() {
        // Timing entries beyond the chosen tokenization carry no text; drop them
        let Some(content) = tokens.get(idx) else {
            break;
        };
        let word_start = parse_iso_duration(&word.offset)?;
        let word_end = word_start + parse_iso_duration(&word.duration)?;
        items.push(RawWord {
            start_time: word_start,
            end_time: word_end,
            content: (*content).to_string(),
        });
    }

    Ok(RawSegment {
        speaker: phrase.speaker,
        start_time: start,
        end_time: end,
        items,
    })
}

/// Parse an ISO-8601 duration of the form Azure emits (`PT1H2M3.45S`,
/// any component optional) into seconds.
pub fn parse_iso_duration(value: &str) -> Result<f64, PipelineError> {
    let malformed = || PipelineError::MalformedDocument(format!("bad duration: {value:?}"));

    let rest = value.strip_prefix("PT").ok_or_else(malformed)?;
    if rest.is_empty() {
        return Err(malformed());
    }

    let mut total = 0.0f64;
    let mut number = String::new();
    for ch in rest.chars() {
        match ch {
            '0'..='9' | '.' => number.push(ch),
            'H' | 'M' | 'S' => {
                let n: f64 = number.parse().map_err(|_| malformed())?;
                total += match ch {
                    'H' => n * 3600.0,
                    'M' => n * 60.0,
                    _ => n,
                };
                number.clear();
            }
            _ => return Err(malformed()),
        }
    }
    if !number.is_empty() {
        // Trailing digits without a unit designator
        return Err(malformed());
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_duration() {
        assert_eq!(parse_iso_duration("PT5S").unwrap(), 5.0);
        assert_eq!(parse_iso_duration("PT0.5S").unwrap(), 0.5);
        assert_eq!(parse_iso_duration("PT2M3S").unwrap(), 123.0);
        assert_eq!(parse_iso_duration("PT1H1M1S").unwrap(), 3661.0);
        assert_eq!(parse_iso_duration("PT12.34S").unwrap(), 12.34);
    }

    #[test]
    fn test_parse_iso_duration_rejects_garbage() {
        assert!(parse_iso_duration("12.34").is_err());
        assert!(parse_iso_duration("PT").is_err());
        assert!(parse_iso_duration("PT5").is_err());
        assert!(parse_iso_duration("P1DT5S").is_err());
    }

    fn azure_json(phrases: &str, display: &str) -> String {
        format!(
            r#"{{
                "combinedRecognizedPhrases": [{{"display": "{display}"}}],
                "recognizedPhrases": [{phrases}]
            }}"#
        )
    }

    #[test]
    fn test_phrase_becomes_segment() {
        let json = azure_json(
            r#"{
                "speaker": 2,
                "offset": "PT10S",
                "duration": "PT4S",
                "nBest": [{
                    "display": "Good morning everyone.",
                    "lexical": "good morning everyone",
                    "words": [
                        {"offset": "PT10S", "duration": "PT1S"},
                        {"offset": "PT11S", "duration": "PT1.5S"},
                        {"offset": "PT12.5S", "duration": "PT1.5S"}
                    ]
                }]
            }"#,
            "Good morning everyone.",
        );

        let intermediate = adapt_azure(&json).unwrap();
        assert_eq!(intermediate.full_text, "Good morning everyone.");
        assert_eq!(intermediate.segments.len(), 1);

        let segment = &intermediate.segments[0];
        assert_eq!(segment.speaker, 2);
        assert_eq!(segment.start_time, 10.0);
        assert_eq!(segment.end_time, 14.0);
        assert_eq!(segment.items.len(), 3);
        assert_eq!(segment.items[0].content, "Good");
        assert_eq!(segment.items[2].content, "everyone.");
        assert_eq!(segment.items[2].start_time, 12.5);
    }

    #[test]
    fn test_falls_back_to_lexical_on_token_count_mismatch() {
        // Display merges "twenty five" into "25": two timing entries, one
        // display token. The lexical form lines up with the timing data.
        let json = azure_json(
            r#"{
                "speaker": 1,
                "offset": "PT0S",
                "duration": "PT2S",
                "nBest": [{
                    "display": "25",
                    "lexical": "twenty five",
                    "words": [
                        {"offset": "PT0S", "duration": "PT1S"},
                        {"offset": "PT1S", "duration": "PT1S"}
                    ]
                }]
            }"#,
            "25",
        );

        let intermediate = adapt_azure(&json).unwrap();
        let words: Vec<&str> = intermediate.segments[0]
            .items
            .iter()
            .map(|w| w.content.as_str())
            .collect();
        assert_eq!(words, vec!["twenty", "five"]);
    }

    #[test]
    fn test_excess_timing_entries_dropped() {
        // More timing entries than tokens: the trailing entry has no text
        let json = azure_json(
            r#"{
                "speaker": 1,
                "offset": "PT0S",
                "duration": "PT3S",
                "nBest": [{
                    "display": "hello there",
                    "lexical": "hello there",
                    "words": [
                        {"offset": "PT0S", "duration": "PT1S"},
                        {"offset": "PT1S", "duration": "PT1S"},
                        {"offset": "PT2S", "duration": "PT1S"}
                    ]
                }]
            }"#,
            "hello there",
        );

        let intermediate = adapt_azure(&json).unwrap();
        assert_eq!(intermediate.segments[0].items.len(), 2);
    }

    #[test]
    fn test_no_phrases_is_empty_transcript() {
        let json = r#"{
            "combinedRecognizedPhrases": [{"display": "text"}],
            "recognizedPhrases": []
        }"#;
        let err = adapt_azure(json).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyTranscript));
    }

    #[test]
    fn test_whitespace_display_is_empty_transcript() {
        let json = azure_json(
            r#"{
                "speaker": 1,
                "offset": "PT0S",
                "duration": "PT1S",
                "nBest": [{"display": " ", "lexical": "", "words": []}]
            }"#,
            " ",
        );
        let err = adapt_azure(&json).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyTranscript));
    }
}
