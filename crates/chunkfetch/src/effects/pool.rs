use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Semaphore, mpsc};

use crate::data::{Chunk, ChunkOutcome};
use crate::effects::fetcher::ChunkFetcher;
use crate::effects::http::HttpClient;
use crate::effects::store::TemporaryStore;
use crate::error::ChunkFailure;

/// Semaphore-gated spawner for chunk downloads.
///
/// At most `concurrency` fetches run at once. Once halted, chunks that have
/// not been dispatched yet are reported as [`ChunkFailure::NotStarted`]
/// instead of being fetched; fetches already running are left alone.
pub struct ChunkPool {
    semaphore: Arc<Semaphore>,
    halted:    Arc<AtomicBool>,
}

impl ChunkPool {
    pub fn new(concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            halted:    Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop dispatching new chunks.
    pub fn halt(&self) { self.halted.store(true, Ordering::Release); }

    /// Dispatch every chunk in order and return the outcome channel.
    ///
    /// Exactly one outcome per chunk is sent. A failing fetch halts the pool
    /// before releasing its slot, so a waiting chunk never starts after a
    /// failure it could have seen.
    pub fn dispatch<C, S>(
        &self,
        fetcher: Arc<ChunkFetcher<C, S>>,
        chunks: Vec<Chunk>,
    ) -> mpsc::UnboundedReceiver<ChunkOutcome<S::Handle>>
    where
        C: HttpClient + 'static,
        S: TemporaryStore,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let semaphore = Arc::clone(&self.semaphore);
        let halted = Arc::clone(&self.halted);

        tokio::spawn(async move {
            for chunk in chunks {
                if halted.load(Ordering::Acquire) {
                    let _ = tx.send(ChunkOutcome::failed(chunk.index, ChunkFailure::NotStarted));
                    continue;
                }

                let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                    let _ = tx.send(ChunkOutcome::failed(chunk.index, ChunkFailure::NotStarted));
                    continue;
                };

                if halted.load(Ordering::Acquire) {
                    drop(permit);
                    let _ = tx.send(ChunkOutcome::failed(chunk.index, ChunkFailure::NotStarted));
                    continue;
                }

                tracing::trace!(index = chunk.index, "dispatching chunk");
                let fetcher = Arc::clone(&fetcher);
                let halted = Arc::clone(&halted);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = fetcher.fetch(chunk).await;
                    let failed = !outcome.is_success();
                    // The failure must be queued ahead of any NotStarted it causes.
                    let _ = tx.send(outcome);
                    if failed {
                        halted.store(true, Ordering::Release);
                    }
                    drop(permit);
                });
            }
        });

        rx
    }
}
