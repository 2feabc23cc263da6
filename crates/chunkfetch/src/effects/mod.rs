//! I/O side of the downloader: HTTP, temporary storage, the worker pool,
//! assembly and the coordinator that ties them together.

mod assembler;
mod coordinator;
mod fetcher;
mod http;
mod pool;
mod prober;
mod store;

pub use assembler::Assembler;
pub use coordinator::DownloadCoordinator;
pub use fetcher::ChunkFetcher;
pub use http::{BoxStream, HttpClient, StreamResponse};
pub use pool::ChunkPool;
pub use prober::CapabilityProber;
pub use store::{DiskPart, DiskStore, TemporaryStore};

#[cfg(feature = "reqwest")]
pub use http::{ClientSettings, ReqwestClient};
