use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use meetscribe::providers::{build_client, send_with_retry};
use meetscribe::{
    adapt, annotate_names, merge_segments, pipeline, resolve_speakers, run_azure_completion,
    run_transcription_job, ActivityClient, AzureClient, CalendarClient, CalendarConfig, Config,
    DeepgramClient, HttpBlobStore, HttpCallback, ProviderFormat, Resolution, ResolverConfig,
    SpeakerActivityEvent, TranscriptionJob,
};

#[derive(Parser)]
#[command(name = "meetscribe")]
#[command(author, version, about = "Meeting transcript normalization and speaker attribution", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Azure,
    Deepgram,
}

impl From<Format> for ProviderFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Azure => ProviderFormat::Azure,
            Format::Deepgram => ProviderFormat::Deepgram,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a provider transcript file into the canonical document
    Process {
        /// Input file with a provider-native transcript JSON
        #[arg(short, long)]
        input: PathBuf,

        /// Which provider's format the input is in
        #[arg(short, long, value_enum)]
        format: Format,

        /// Output file for the canonical document
        #[arg(short, long)]
        output: PathBuf,

        /// Optional speaker-activity events file (JSON list) for name resolution
        #[arg(long)]
        events: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run a transcription job end to end against the live providers
    Run {
        /// Job identifier (generated when omitted)
        #[arg(long)]
        job_id: Option<String>,

        /// URL of the recording to transcribe
        #[arg(long)]
        source_url: String,

        /// Language hints (repeatable)
        #[arg(long = "lang")]
        language_hints: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Fetch a finished Azure transcription and run the normalization tail
    FetchAzure {
        /// The transcription's `self` link from the submission
        #[arg(long)]
        transcription_url: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Register a Google Calendar watch channel for a user
    WatchCalendar {
        /// The user's OAuth refresh token
        #[arg(long)]
        refresh_token: String,

        /// Identifier of the user the channel belongs to
        #[arg(long)]
        user_id: String,

        /// Callback URL to receive the channel registration result
        #[arg(long)]
        callback_url: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            format,
            output,
            events,
            verbose,
        } => {
            setup_logging(verbose);
            process_file(input, format, output, events)
        }
        Commands::Run {
            job_id,
            source_url,
            language_hints,
            verbose,
        } => {
            setup_logging(verbose);
            run_job(job_id, source_url, language_hints).await
        }
        Commands::FetchAzure {
            transcription_url,
            verbose,
        } => {
            setup_logging(verbose);
            fetch_azure(transcription_url).await
        }
        Commands::WatchCalendar {
            refresh_token,
            user_id,
            callback_url,
            verbose,
        } => {
            setup_logging(verbose);
            watch_calendar(refresh_token, user_id, callback_url).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn process_file(
    input: PathBuf,
    format: Format,
    output: PathBuf,
    events_path: Option<PathBuf>,
) -> Result<()> {
    info!("Loading transcript from {:?}", input);
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read file: {:?}", input))?;

    let intermediate =
        adapt(format.into(), &raw).context("Failed to adapt provider transcript")?;
    info!("Adapted {} provider segments", intermediate.segments.len());

    let merged = merge_segments(intermediate);
    let mut document = merged.document;
    info!(
        "Merged into {} segments across {} speakers ({} collapsed)",
        document.segments.len(),
        document.speaker_count,
        merged.segments_merged
    );

    let events: Vec<SpeakerActivityEvent> = match &events_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read events file: {:?}", path))?;
            serde_json::from_str(&content).context("Failed to parse events file")?
        }
        None => vec![],
    };

    let resolution = resolve_speakers(&document, &events, &ResolverConfig::default());
    if let Resolution::Degraded { reason } = &resolution {
        info!("Speaker resolution degraded: {reason}");
    }
    annotate_names(&mut document, &resolution.mapping());

    let serialized = serde_json::to_string_pretty(&document)?;
    std::fs::write(&output, serialized)
        .with_context(|| format!("Failed to write output: {:?}", output))?;
    info!("Canonical document written to {:?}", output);

    Ok(())
}

async fn run_job(
    job_id: Option<String>,
    source_url: String,
    language_hints: Vec<String>,
) -> Result<()> {
    let config = Config::from_env()?;
    let client = build_client()?;

    let job = TranscriptionJob {
        job_id: job_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        source_url,
        language_hints,
    };
    info!("Running job {}", job.job_id);

    let deepgram = DeepgramClient::new(client.clone(), &config.deepgram_token_url);
    let azure = AzureClient::new(client.clone(), &config.azure_endpoint, &config.azure_key);
    let speech = pipeline::LiveSpeech {
        deepgram: &deepgram,
        azure: &azure,
    };
    let activity = ActivityClient::new(client.clone(), &config.activity_api_url);
    let store = HttpBlobStore::new(client.clone(), &config.blob_endpoint, &config.bucket_name);
    let callbacks = HttpCallback::new(
        client,
        &config.done_callback_url,
        &config.failed_callback_url,
        &config.created_callback_url,
    );

    let outcome = run_transcription_job(&job, &speech, &activity, &store, &callbacks).await?;
    info!(
        "Job {} finished with status {}",
        job.job_id,
        outcome.status.as_str()
    );

    Ok(())
}

async fn fetch_azure(transcription_url: String) -> Result<()> {
    let config = Config::from_env()?;
    let client = build_client()?;

    let azure = AzureClient::new(client.clone(), &config.azure_endpoint, &config.azure_key);
    let activity = ActivityClient::new(client.clone(), &config.activity_api_url);
    let store = HttpBlobStore::new(client.clone(), &config.blob_endpoint, &config.bucket_name);
    let callbacks = HttpCallback::new(
        client,
        &config.done_callback_url,
        &config.failed_callback_url,
        &config.created_callback_url,
    );

    let outcome =
        run_azure_completion(&azure, &transcription_url, &activity, &store, &callbacks).await?;
    info!("Azure fetch finished with status {}", outcome.status.as_str());

    Ok(())
}

async fn watch_calendar(
    refresh_token: String,
    user_id: String,
    callback_url: String,
) -> Result<()> {
    let config = CalendarConfig::from_env()?;
    let client = build_client()?;
    let calendar = CalendarClient::new(client.clone(), config);

    let body = match calendar.start_watch(&refresh_token).await {
        Ok(channel) => {
            info!("Watch channel {} registered", channel.channel_id);
            json!({
                "uuid": user_id,
                "google_sync": "",
                "google_channel": channel.channel_id,
                "google_expiry": channel.expiration,
            })
        }
        Err(error) => {
            info!("Watch registration failed: {error:#}");
            json!({ "msg": "Failed" })
        }
    };

    send_with_retry(client.post(&callback_url).json(&body))
        .await
        .context("Failed to deliver calendar callback")?;

    Ok(())
}
