pub mod azure;
pub mod canonical;
pub mod deepgram;
pub mod job;

pub use azure::*;
pub use canonical::*;
pub use deepgram::*;
pub use job::*;
