//! Chunked HTTP(S) downloads with bounded concurrency and ordered reassembly.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations (planning, range headers, probe checks)
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Flow
//!
//! A download probes the resource with HEAD, splits it into fixed-size byte
//! ranges, fetches at most `concurrency` ranges at once into a temporary
//! store, and concatenates the stored parts in index order into one file.
//! The first error observed is the one reported; nothing is retried.
//!
//! ```no_run
//! # async fn demo() -> chunkfetch::Result<()> {
//! use chunkfetch::{DownloadOptions, DownloadRequest};
//!
//! let request = DownloadRequest::new("https://example.com/archive.zip")?;
//! let path = chunkfetch::download(request, DownloadOptions::default()).await?;
//! println!("saved to {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use data::{
    Chunk, ChunkOutcome, ChunkStatus, DEFAULT_CHUNK_SIZE, DEFAULT_CONCURRENCY, DownloadOptions,
    DownloadRequest, DownloadState, ProbeResult, Progress, ProgressCallback, ResponseHead,
};
pub use effects::{
    Assembler, BoxStream, CapabilityProber, ChunkFetcher, ChunkPool, DiskPart, DiskStore,
    DownloadCoordinator, HttpClient, StreamResponse, TemporaryStore,
};
#[cfg(feature = "reqwest")]
pub use effects::{ClientSettings, ReqwestClient};
pub use error::{ChunkFailure, ERROR_CODE_BASE, Error, ErrorCategory, Result};

/// Download `request` with the default reqwest client, storing parts and
/// the result under `options.scratch_dir`.
#[cfg(feature = "reqwest")]
pub async fn download(
    request: DownloadRequest,
    options: DownloadOptions,
) -> Result<std::path::PathBuf> {
    let client = ReqwestClient::new()?;
    DownloadCoordinator::on_disk(client, request, options)?
        .run()
        .await
}
