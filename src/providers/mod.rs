pub mod activity;
pub mod azure;
pub mod calendar;
pub mod deepgram;
pub mod http;

pub use activity::ActivityClient;
pub use azure::{AzureClient, AzureResult};
pub use calendar::{CalendarClient, WatchChannel};
pub use deepgram::DeepgramClient;
pub use http::{build_client, send_with_retry};
