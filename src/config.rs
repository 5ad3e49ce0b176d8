use anyhow::{Context, Result};

/// Environment-driven configuration for the pipeline's collaborators
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint that issues a short-lived Deepgram API token
    pub deepgram_token_url: String,
    /// Azure Speech subscription key
    pub azure_key: String,
    /// Azure Speech batch transcription endpoint
    pub azure_endpoint: String,
    /// Callback for completed jobs
    pub done_callback_url: String,
    /// Callback for hard failures
    pub failed_callback_url: String,
    /// Callback notified when an Azure job has been submitted
    pub created_callback_url: String,
    /// Blob store endpoint
    pub blob_endpoint: String,
    /// Blob store bucket for final documents
    pub bucket_name: String,
    /// Meeting-bot API serving speaker-activity timelines
    pub activity_api_url: String,
}

impl Config {
    /// Read configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            deepgram_token_url: require("DEEPGRAM_TOKEN_URL")?,
            azure_key: require("AZURE_KEY")?,
            azure_endpoint: std::env::var("AZURE_ENDPOINT").unwrap_or_else(|_| {
                "https://northeurope.api.cognitive.microsoft.com/speechtotext/v3.1".to_string()
            }),
            done_callback_url: require("DONE_CALLBACK_URL")?,
            failed_callback_url: require("FAILED_CALLBACK_URL")?,
            created_callback_url: require("CREATED_CALLBACK_URL")?,
            blob_endpoint: require("BLOB_ENDPOINT")?,
            bucket_name: require("BUCKET_NAME")?,
            activity_api_url: require("ACTIVITY_API_URL")?,
        })
    }
}

/// Configuration for the calendar watch job
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub google_client_id: String,
    pub google_secret: String,
    /// Verification token echoed back on watch notifications
    pub google_token: String,
    /// Address Google pushes event notifications to
    pub event_ping_url: String,
}

impl CalendarConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            google_client_id: require("GOOGLE_CLIENT_ID")?,
            google_secret: require("GOOGLE_SECRET")?,
            google_token: require("GOOGLE_TOKEN")?,
            event_ping_url: require("EVENT_PING_URL")?,
        })
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} environment variable not set"))
}
