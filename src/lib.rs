pub mod adapters;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod stages;

pub use adapters::{adapt, IntermediateTranscript, ProviderFormat};
pub use config::{CalendarConfig, Config};
pub use error::PipelineError;
pub use io::{document_key, BlobStore, CallbackSink, HttpBlobStore, HttpCallback};
pub use models::{
    JobState, JobStatus, Segment, SpeakerActivityEvent, SpeakerNameMapping, TranscriptDocument,
    TranscriptionJob, WordItem,
};
pub use pipeline::{
    run_azure_completion, run_transcription_job, select_provider, JobOutcome, ProviderChoice,
};
pub use providers::{ActivityClient, AzureClient, CalendarClient, DeepgramClient};
pub use stages::{
    annotate_names, merge_segments, resolve_speakers, MergeResult, Resolution, ResolverConfig,
};
