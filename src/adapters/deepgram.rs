use crate::adapters::{IntermediateTranscript, RawSegment, RawWord};
use crate::error::PipelineError;
use crate::models::DeepgramResponse;

/// Convert a Deepgram word-stream response into the intermediate shape.
///
/// Deepgram delivers a flat chronological word list; consecutive words with
/// the same speaker id fold into one segment. A new segment begins whenever
/// the speaker id changes, and the terminal run is flushed after the loop —
/// dropping it would silently lose the last speaker's segment.
pub fn adapt_deepgram(json: &str) -> Result<IntermediateTranscript, PipelineError> {
    let response: DeepgramResponse = serde_json::from_str(json)
        .map_err(|e| PipelineError::MalformedDocument(format!("deepgram response: {e}")))?;
    adapt_deepgram_response(&response)
}

/// Intermediate conversion over an already-parsed response
pub fn adapt_deepgram_response(
    response: &DeepgramResponse,
) -> Result<IntermediateTranscript, PipelineError> {
    let words = response.words();
    let transcript = response.transcript();

    if words.is_empty() || transcript.trim().is_empty() {
        return Err(PipelineError::EmptyTranscript);
    }

    let mut segments: Vec<RawSegment> = Vec::new();
    let mut current_speaker: Option<u32> = None;
    let mut run: Vec<RawWord> = Vec::new();

    for word in words {
        if current_speaker.is_some_and(|s| s != word.speaker) {
            flush_run(&mut segments, current_speaker, &mut run);
        }
        current_speaker = Some(word.speaker);
        run.push(RawWord {
            start_time: word.start,
            end_time: word.end,
            content: word.rendered().to_string(),
        });
    }

    // Terminal flush: the last speaker's run has no following change to close it
    flush_run(&mut segments, current_speaker, &mut run);

    Ok(IntermediateTranscript {
        full_text: transcript.to_string(),
        segments,
    })
}

fn flush_run(segments: &mut Vec<RawSegment>, speaker: Option<u32>, run: &mut Vec<RawWord>) {
    if run.is_empty() {
        return;
    }
    let Some(speaker) = speaker else {
        return;
    };
    let items = std::mem::take(run);
    segments.push(RawSegment {
        speaker,
        start_time: items.first().map(|w| w.start_time).unwrap_or(0.0),
        end_time: items.last().map(|w| w.end_time).unwrap_or(0.0),
        items,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_json(words: &str) -> String {
        format!(
            r#"{{
                "results": {{
                    "channels": [{{
                        "alternatives": [{{
                            "transcript": "hi there hello",
                            "words": [{words}]
                        }}]
                    }}]
                }}
            }}"#
        )
    }

    #[test]
    fn test_folds_runs_and_flushes_terminal_segment() {
        let json = response_json(
            r#"{"word": "hi", "start": 0.0, "end": 1.0, "speaker": 0},
               {"word": "there", "start": 1.0, "end": 2.0, "speaker": 0},
               {"word": "hello", "start": 2.0, "end": 3.0, "speaker": 1}"#,
        );

        let intermediate = adapt_deepgram(&json).unwrap();

        assert_eq!(intermediate.segments.len(), 2);

        let first = &intermediate.segments[0];
        assert_eq!(first.speaker, 0);
        assert_eq!(first.start_time, 0.0);
        assert_eq!(first.end_time, 2.0);
        let words: Vec<&str> = first.items.iter().map(|w| w.content.as_str()).collect();
        assert_eq!(words, vec!["hi", "there"]);

        // Both speakers present: the last run was flushed
        let second = &intermediate.segments[1];
        assert_eq!(second.speaker, 1);
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].content, "hello");
    }

    #[test]
    fn test_single_speaker_yields_one_segment() {
        let json = response_json(
            r#"{"word": "all", "start": 0.0, "end": 0.5, "speaker": 2},
               {"word": "mine", "start": 0.5, "end": 1.0, "speaker": 2}"#,
        );

        let intermediate = adapt_deepgram(&json).unwrap();
        assert_eq!(intermediate.segments.len(), 1);
        assert_eq!(intermediate.segments[0].speaker, 2);
        assert_eq!(intermediate.item_count(), 2);
    }

    #[test]
    fn test_prefers_punctuated_rendering() {
        let json = response_json(
            r#"{"word": "hello", "start": 0.0, "end": 0.5, "speaker": 0, "punctuated_word": "Hello,"}"#,
        );

        let intermediate = adapt_deepgram(&json).unwrap();
        assert_eq!(intermediate.segments[0].items[0].content, "Hello,");
    }

    #[test]
    fn test_empty_words_is_empty_transcript() {
        let json = r#"{
            "results": {
                "channels": [{
                    "alternatives": [{"transcript": "", "words": []}]
                }]
            }
        }"#;

        let err = adapt_deepgram(json).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyTranscript));
    }

    #[test]
    fn test_whitespace_transcript_is_empty() {
        let json = r#"{
            "results": {
                "channels": [{
                    "alternatives": [{
                        "transcript": "   ",
                        "words": [{"word": "x", "start": 0.0, "end": 0.1, "speaker": 0}]
                    }]
                }]
            }
        }"#;

        let err = adapt_deepgram(json).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyTranscript));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = adapt_deepgram("not json").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedDocument(_)));
    }
}
