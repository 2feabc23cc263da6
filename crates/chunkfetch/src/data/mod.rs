//! Immutable data types for chunked downloads.

pub mod chunk;
pub mod options;
pub mod progress;
pub mod request;
pub mod response;
pub mod state;

pub use chunk::{Chunk, ChunkOutcome, ChunkStatus, ProbeResult};
pub use options::{DEFAULT_CONCURRENCY, DownloadOptions, ProgressCallback};
pub use progress::Progress;
pub use request::{DEFAULT_CHUNK_SIZE, DownloadRequest};
pub use response::ResponseHead;
pub use state::DownloadState;
