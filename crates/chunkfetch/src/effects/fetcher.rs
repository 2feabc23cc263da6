use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::core::range_header;
use crate::data::{Chunk, ChunkOutcome};
use crate::effects::http::HttpClient;
use crate::effects::store::TemporaryStore;
use crate::error::ChunkFailure;

const PARTIAL_CONTENT: u16 = 206;

/// Fetches single chunks with ranged GET requests into a [`TemporaryStore`].
pub struct ChunkFetcher<C: HttpClient, S: TemporaryStore> {
    client:  Arc<C>,
    store:   Arc<S>,
    url:     String,
    headers: Arc<[(String, String)]>,
}

impl<C: HttpClient, S: TemporaryStore> ChunkFetcher<C, S> {
    pub fn new(
        client: Arc<C>,
        store: Arc<S>,
        url: impl Into<String>,
        headers: Arc<[(String, String)]>,
    ) -> Self {
        Self {
            client,
            store,
            url: url.into(),
            headers,
        }
    }

    /// Download `chunk` and report its outcome. Never panics on I/O errors;
    /// every failure becomes a failed outcome for this chunk's index.
    pub async fn fetch(&self, chunk: Chunk) -> ChunkOutcome<S::Handle> {
        match self.try_fetch(&chunk).await {
            Ok(handle) => {
                tracing::debug!(index = chunk.index, bytes = chunk.len(), "chunk stored");
                ChunkOutcome::succeeded(chunk.index, handle)
            }
            Err(failure) => {
                tracing::warn!(index = chunk.index, %failure, "chunk failed");
                ChunkOutcome::failed(chunk.index, failure)
            }
        }
    }

    async fn try_fetch(&self, chunk: &Chunk) -> Result<S::Handle, ChunkFailure> {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push(("Range".to_string(), range_header(chunk)));

        let response = self
            .client
            .stream(&self.url, &headers)
            .await
            .map_err(|e| ChunkFailure::Transport(e.to_string()))?;

        if response.head.status != PARTIAL_CONTENT {
            return Err(ChunkFailure::UnexpectedStatus(response.head.status));
        }

        let mut writer = self
            .store
            .allocate(chunk.index)
            .await
            .map_err(|e| ChunkFailure::Store(e.to_string()))?;

        let expected = chunk.len();
        let mut received = 0u64;
        let mut body = response.body;

        while let Some(bytes) = body.next().await {
            let bytes = bytes.map_err(|e| ChunkFailure::Body(e.to_string()))?;
            received += bytes.len() as u64;
            if received > expected {
                return Err(ChunkFailure::LengthMismatch {
                    expected,
                    actual: received,
                });
            }
            writer
                .write_all(&bytes)
                .await
                .map_err(|e| ChunkFailure::Store(e.to_string()))?;
        }

        if received != expected {
            return Err(ChunkFailure::LengthMismatch {
                expected,
                actual: received,
            });
        }

        self.store
            .seal(chunk.index, writer)
            .await
            .map_err(|e| ChunkFailure::Store(e.to_string()))
    }
}
