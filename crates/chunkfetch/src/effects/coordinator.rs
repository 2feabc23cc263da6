use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chunkfetch_fs::ScratchDir;
use tokio::task::JoinHandle;

use crate::core::plan_chunks;
use crate::data::{Chunk, ChunkOutcome, DownloadOptions, DownloadRequest, DownloadState, Progress};
use crate::effects::assembler::Assembler;
use crate::effects::fetcher::ChunkFetcher;
use crate::effects::http::HttpClient;
use crate::effects::pool::ChunkPool;
use crate::effects::prober::CapabilityProber;
use crate::effects::store::{DiskStore, TemporaryStore};
use crate::error::{ChunkFailure, Error, Result};

/// Holds the first error of a download attempt; later ones are dropped.
#[derive(Debug, Default)]
struct ErrorLatch(Option<Error>);

impl ErrorLatch {
    /// Returns `true` if `err` was latched, `false` if one already was.
    fn latch(&mut self, err: Error) -> bool {
        if self.0.is_some() {
            tracing::debug!(error = %err, "discarding error, one is already latched");
            return false;
        }
        self.0 = Some(err);
        true
    }

    fn take(&mut self) -> Option<Error> { self.0.take() }
}

/// Drives one download from probe to assembled file.
///
/// The coordinator owns its collaborators and is consumed by [`run`],
/// [`start`] or [`spawn`], so a result is produced exactly once per
/// coordinator.
///
/// [`run`]: DownloadCoordinator::run
/// [`start`]: DownloadCoordinator::start
/// [`spawn`]: DownloadCoordinator::spawn
pub struct DownloadCoordinator<C: HttpClient, S: TemporaryStore> {
    client:   Arc<C>,
    store:    Arc<S>,
    scratch:  ScratchDir,
    request:  DownloadRequest,
    options:  DownloadOptions,
    state:    DownloadState,
    progress: Progress,
    latch:    ErrorLatch,
}

impl<C: HttpClient + 'static> DownloadCoordinator<C, DiskStore> {
    /// Coordinator storing parts and the result under `options.scratch_dir`.
    pub fn on_disk(client: C, request: DownloadRequest, options: DownloadOptions) -> Result<Self> {
        let scratch = ScratchDir::new(&options.scratch_dir).map_err(Error::MissingFileSaveLocation)?;
        let store = DiskStore::new(scratch.clone());
        Self::new(Arc::new(client), Arc::new(store), scratch, request, options)
    }
}

impl<C: HttpClient + 'static, S: TemporaryStore> DownloadCoordinator<C, S> {
    /// Build a coordinator from explicit dependencies.
    ///
    /// `options.scratch_dir` is ignored here; `scratch` is where the
    /// assembled file goes.
    pub fn new(
        client: Arc<C>,
        store: Arc<S>,
        scratch: ScratchDir,
        request: DownloadRequest,
        options: DownloadOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            client,
            store,
            scratch,
            request,
            options,
            state: DownloadState::Idle,
            progress: Progress::default(),
            latch: ErrorLatch::default(),
        })
    }

    /// Run the download and hand the result to `on_complete`, exactly once.
    pub async fn start<F>(self, on_complete: F)
    where
        F: FnOnce(Result<PathBuf>) + Send,
    {
        on_complete(self.run().await);
    }

    /// Run the download on the tokio runtime, reporting through `on_complete`.
    pub fn spawn<F>(self, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<PathBuf>) + Send + 'static,
    {
        tokio::spawn(self.start(on_complete))
    }

    /// Run the download to a terminal state.
    pub async fn run(mut self) -> Result<PathBuf> {
        let url = self.request.url().as_str().to_string();
        tracing::info!(
            %url,
            chunk_size = self.request.chunk_size(),
            scratch = %self.scratch.path().display(),
            "starting download"
        );

        self.transition(DownloadState::Probing);
        let prober = CapabilityProber::new(Arc::clone(&self.client));
        let probe = match prober.probe(&url).await {
            Ok(probe) => probe,
            Err(err) => return self.fail(err),
        };
        self.progress.total_bytes = Some(probe.total_length);

        self.transition(DownloadState::Planning);
        let chunks = match plan_chunks(probe.total_length, self.request.chunk_size()) {
            Ok(chunks) => chunks,
            Err(err) => return self.fail(err),
        };
        self.progress.chunks_total = chunks.len() as u32;
        tracing::debug!(chunks = chunks.len(), "planned");

        self.transition(DownloadState::Fetching);
        let outcomes = self.fetch_all(&url, &chunks).await;

        self.transition(DownloadState::Assembling);
        let assembler = Assembler::new(self.scratch.clone(), Arc::clone(&self.store));
        let assembled = assembler
            .assemble(&outcomes, chunks.len(), self.request.extension_hint())
            .await;

        match assembled {
            Ok(path) => match self.latch.take() {
                None => {
                    self.transition(DownloadState::Completed);
                    tracing::info!(path = %path.display(), bytes = probe.total_length, "download completed");
                    Ok(path)
                }
                Some(err) => self.fail(err),
            },
            Err(err) => self.fail(err),
        }
    }

    /// Fan chunks out through the pool and aggregate every outcome.
    ///
    /// This loop is the only writer of the outcome map and the latch.
    async fn fetch_all(&mut self, url: &str, chunks: &[Chunk]) -> BTreeMap<u32, ChunkOutcome<S::Handle>> {
        let fetcher = Arc::new(ChunkFetcher::new(
            Arc::clone(&self.client),
            Arc::clone(&self.store),
            url,
            Arc::clone(&self.options.headers),
        ));
        let pool = ChunkPool::new(self.options.concurrency);
        let mut rx = pool.dispatch(fetcher, chunks.to_vec());

        let mut outcomes = BTreeMap::new();
        while outcomes.len() < chunks.len() {
            let Some(outcome) = rx.recv().await else {
                break;
            };

            if outcomes.contains_key(&outcome.index) {
                tracing::warn!(index = outcome.index, "duplicate chunk outcome ignored");
                continue;
            }

            if let Some(failure) = outcome.failure() {
                pool.halt();
                self.latch.latch(Error::PartialDownloadFail {
                    index:  outcome.index,
                    reason: failure.clone(),
                });
            } else if let Some(chunk) = chunks.get(outcome.index as usize) {
                self.progress.bytes_downloaded += chunk.len();
            }

            outcomes.insert(outcome.index, outcome);
            self.progress.chunks_completed = outcomes.len() as u32;
            self.emit();
        }

        for chunk in chunks {
            if !outcomes.contains_key(&chunk.index) {
                self.latch.latch(Error::PartialDownloadFail {
                    index:  chunk.index,
                    reason: ChunkFailure::Lost,
                });
                outcomes.insert(chunk.index, ChunkOutcome::failed(chunk.index, ChunkFailure::Lost));
            }
        }

        outcomes
    }

    fn fail(mut self, err: Error) -> Result<PathBuf> {
        let err = match self.latch.take() {
            Some(first) => {
                tracing::debug!(error = %err, "discarding error, one is already latched");
                first
            }
            None => err,
        };
        self.transition(DownloadState::Failed);
        tracing::warn!(code = err.code(), error = %err, "download failed");
        Err(err)
    }

    fn transition(&mut self, next: DownloadState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
        self.progress.state = next;
        self.emit();
    }

    fn emit(&self) {
        if let Some(ref callback) = self.options.on_progress {
            callback(&self.progress);
        }
    }
}
