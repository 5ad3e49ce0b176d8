pub mod callback;
pub mod storage;

pub use callback::{CallbackSink, HttpCallback};
pub use storage::{document_key, BlobStore, HttpBlobStore};
