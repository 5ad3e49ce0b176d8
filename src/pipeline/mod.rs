pub mod select;

pub use select::{select_provider, ProviderChoice, DEEPGRAM_LANGS};

use anyhow::Result;
use tracing::{info, warn};

use crate::adapters::{adapt, ProviderFormat};
use crate::error::PipelineError;
use crate::io::{document_key, BlobStore, CallbackSink};
use crate::models::{
    AzureSubmission, JobState, JobStatus, SpeakerActivityEvent, TranscriptDocument,
    TranscriptionJob,
};
use crate::providers::{ActivityClient, AzureClient, AzureResult, DeepgramClient};
use crate::stages::{annotate_names, merge_segments, resolve_speakers, Resolution, ResolverConfig};

/// Speech-provider seam for the orchestrator
#[allow(async_fn_in_trait)]
pub trait SpeechProvider {
    async fn transcribe_deepgram(&self, source_url: &str, language: Option<&str>)
        -> Result<String>;
    async fn submit_azure_manual(
        &self,
        source_url: &str,
        job_id: &str,
        locale: &str,
    ) -> Result<AzureSubmission>;
    async fn submit_azure_detect(
        &self,
        source_url: &str,
        job_id: &str,
        candidate_locales: &[String],
    ) -> Result<AzureSubmission>;
}

/// Activity-timeline seam for the orchestrator
#[allow(async_fn_in_trait)]
pub trait ActivitySource {
    async fn fetch_events(&self, external_id: &str) -> Result<Vec<SpeakerActivityEvent>>;
}

/// Production speech provider wrapping the live clients
pub struct LiveSpeech<'a> {
    pub deepgram: &'a DeepgramClient,
    pub azure: &'a AzureClient,
}

impl SpeechProvider for LiveSpeech<'_> {
    async fn transcribe_deepgram(
        &self,
        source_url: &str,
        language: Option<&str>,
    ) -> Result<String> {
        self.deepgram.transcribe(source_url, language).await
    }

    async fn submit_azure_manual(
        &self,
        source_url: &str,
        job_id: &str,
        locale: &str,
    ) -> Result<AzureSubmission> {
        self.azure.submit_manual(source_url, job_id, locale).await
    }

    async fn submit_azure_detect(
        &self,
        source_url: &str,
        job_id: &str,
        candidate_locales: &[String],
    ) -> Result<AzureSubmission> {
        self.azure
            .submit_detect_language(source_url, job_id, candidate_locales)
            .await
    }
}

impl ActivitySource for ActivityClient {
    async fn fetch_events(&self, external_id: &str) -> Result<Vec<SpeakerActivityEvent>> {
        ActivityClient::fetch_events(self, external_id).await
    }
}

/// Terminal result of one job run
#[derive(Debug)]
pub struct JobOutcome {
    pub status: JobStatus,
    pub state: JobState,
    /// Present when a document was produced and persisted
    pub document: Option<TranscriptDocument>,
}

fn transition(job_id: &str, state: JobState) {
    info!(job_id, state = state.as_str(), "job state");
}

/// Run one transcription job end to end.
///
/// Hard failures notify the failure callback with the job id and a readable
/// reason, then re-raise so the enclosing job queue can apply its retry
/// policy. An empty transcript is a valid terminal outcome (`EMPTY` on the
/// normal callback, no blob written). Speaker-resolution degradation never
/// aborts the job.
pub async fn run_transcription_job<S, A, B, C>(
    job: &TranscriptionJob,
    speech: &S,
    activity: &A,
    store: &B,
    callbacks: &C,
) -> Result<JobOutcome, PipelineError>
where
    S: SpeechProvider,
    A: ActivitySource,
    B: BlobStore,
    C: CallbackSink,
{
    match execute(job, speech, activity, store, callbacks).await {
        Ok(outcome) => Ok(outcome),
        Err(error) => {
            transition(&job.job_id, JobState::Failed);
            if error.notifies_failure_callback() {
                if let Err(cb_error) = callbacks.post_failed(&job.job_id, &error.to_string()).await
                {
                    warn!(job_id = %job.job_id, error = %cb_error, "failure callback undeliverable");
                }
            }
            Err(error)
        }
    }
}

async fn execute<S, A, B, C>(
    job: &TranscriptionJob,
    speech: &S,
    activity: &A,
    store: &B,
    callbacks: &C,
) -> Result<JobOutcome, PipelineError>
where
    S: SpeechProvider,
    A: ActivitySource,
    B: BlobStore,
    C: CallbackSink,
{
    transition(&job.job_id, JobState::Received);

    let choice = select_provider(&job.language_hints);
    let status = choice.status();
    transition(&job.job_id, JobState::ProviderSelected);

    let raw_json = match &choice {
        ProviderChoice::DeepgramDetect => speech
            .transcribe_deepgram(&job.source_url, None)
            .await
            .map_err(|e| PipelineError::ProviderCall(e.to_string()))?,
        ProviderChoice::DeepgramFixed(code) => speech
            .transcribe_deepgram(&job.source_url, Some(code))
            .await
            .map_err(|e| PipelineError::ProviderCall(e.to_string()))?,
        ProviderChoice::AzureManual(locale) => {
            let submission = speech
                .submit_azure_manual(&job.source_url, &job.job_id, locale)
                .await
                .map_err(|e| PipelineError::ProviderCall(e.to_string()))?;
            return finish_azure_submission(job, submission, status, callbacks).await;
        }
        ProviderChoice::AzureDetect(locales) => {
            let submission = speech
                .submit_azure_detect(&job.source_url, &job.job_id, locales)
                .await
                .map_err(|e| PipelineError::ProviderCall(e.to_string()))?;
            return finish_azure_submission(job, submission, status, callbacks).await;
        }
    };
    transition(&job.job_id, JobState::ProviderCalled);

    finish_transcript(
        &job.job_id,
        ProviderFormat::Deepgram,
        &raw_json,
        status,
        activity,
        store,
        callbacks,
    )
    .await
}

/// The Azure path is asynchronous: report the submission status now, fetch
/// the transcript later when the provider's webhook fires.
async fn finish_azure_submission<C: CallbackSink>(
    job: &TranscriptionJob,
    submission: AzureSubmission,
    status: JobStatus,
    callbacks: &C,
) -> Result<JobOutcome, PipelineError> {
    // The `self` link is the success marker; anything else is a provider
    // failure rather than a silently degraded document
    let Some(transcription_url) = submission.self_url.as_deref() else {
        return Err(PipelineError::ProviderCall(
            "azure submission response carried no self link".to_string(),
        ));
    };
    transition(&job.job_id, JobState::ProviderCalled);

    // The created callback hands the transcription's self link to whoever
    // schedules the completion job
    callbacks
        .post_created(&job.job_id, status, transcription_url)
        .await?;

    callbacks.post_done(&job.job_id, status).await?;
    transition(&job.job_id, JobState::CallbackSent);

    Ok(JobOutcome {
        status,
        state: JobState::CallbackSent,
        document: None,
    })
}

/// Completion job for the asynchronous Azure path: fetch the finished
/// transcript and run the normalization tail over it.
pub async fn run_azure_completion<A, B, C>(
    azure: &AzureClient,
    transcription_url: &str,
    activity: &A,
    store: &B,
    callbacks: &C,
) -> Result<JobOutcome, PipelineError>
where
    A: ActivitySource,
    B: BlobStore,
    C: CallbackSink,
{
    let AzureResult {
        job_id,
        transcript_json,
    } = azure
        .fetch_result(transcription_url)
        .await
        .map_err(|e| PipelineError::ProviderCall(e.to_string()))?;

    let Some(raw_json) = transcript_json else {
        info!(job_id = %job_id, "azure transcription still running");
        return Ok(JobOutcome {
            status: JobStatus::Running,
            state: JobState::ProviderCalled,
            document: None,
        });
    };

    let result = finish_transcript(
        &job_id,
        ProviderFormat::Azure,
        &raw_json,
        JobStatus::Complete,
        activity,
        store,
        callbacks,
    )
    .await;

    match result {
        Ok(outcome) => Ok(outcome),
        Err(error) => {
            transition(&job_id, JobState::Failed);
            if error.notifies_failure_callback() {
                if let Err(cb_error) = callbacks.post_failed(&job_id, &error.to_string()).await {
                    warn!(job_id = %job_id, error = %cb_error, "failure callback undeliverable");
                }
            }
            Err(error)
        }
    }
}

/// Shared tail: adapt, merge, resolve, annotate, persist, callback
async fn finish_transcript<A, B, C>(
    job_id: &str,
    format: ProviderFormat,
    raw_json: &str,
    status: JobStatus,
    activity: &A,
    store: &B,
    callbacks: &C,
) -> Result<JobOutcome, PipelineError>
where
    A: ActivitySource,
    B: BlobStore,
    C: CallbackSink,
{
    transition(job_id, JobState::Normalizing);
    let intermediate = match adapt(format, raw_json) {
        Ok(intermediate) => intermediate,
        Err(PipelineError::EmptyTranscript) => {
            // Valid terminal outcome: no blob, normal callback
            info!(job_id, "provider produced no usable words");
            callbacks.post_done(job_id, JobStatus::Empty).await?;
            transition(job_id, JobState::CallbackSent);
            return Ok(JobOutcome {
                status: JobStatus::Empty,
                state: JobState::CallbackSent,
                document: None,
            });
        }
        Err(other) => return Err(other),
    };

    let merged = merge_segments(intermediate);
    let mut document = merged.document;
    info!(
        job_id,
        segments = document.segments.len(),
        speakers = document.speaker_count,
        merged = merged.segments_merged,
        "transcript normalized"
    );

    transition(job_id, JobState::ResolvingSpeakers);
    let resolution = match activity.fetch_events(job_id).await {
        Ok(events) => resolve_speakers(&document, &events, &ResolverConfig::default()),
        Err(error) => Resolution::Degraded {
            reason: error.to_string(),
        },
    };
    if let Resolution::Degraded { reason } = &resolution {
        // Soft failure: generic display names instead of an abort
        warn!(job_id, reason = %reason, "speaker resolution degraded");
    }
    annotate_names(&mut document, &resolution.mapping());

    store.put_document(&document_key(job_id), &document).await?;
    transition(job_id, JobState::Persisted);

    callbacks.post_done(job_id, status).await?;
    transition(job_id, JobState::CallbackSent);

    Ok(JobOutcome {
        status,
        state: JobState::CallbackSent,
        document: Some(document),
    })
}
