use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chunkfetch_fs::ScratchDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};

use crate::data::{ChunkOutcome, ChunkStatus};
use crate::effects::store::TemporaryStore;
use crate::error::{ChunkFailure, Error, Result};

/// Concatenates stored chunks, in index order, into one destination file.
pub struct Assembler<S: TemporaryStore> {
    scratch: ScratchDir,
    store:   Arc<S>,
}

impl<S: TemporaryStore> Assembler<S> {
    pub fn new(scratch: ScratchDir, store: Arc<S>) -> Self { Self { scratch, store } }

    /// Assemble `expected` chunk outcomes into a fresh file in the scratch
    /// directory, named uniquely and ending in `extension` when given.
    ///
    /// The outcome map must be complete. Any failed or missing chunk fails
    /// with [`Error::PartialDownloadFail`] before the filesystem is touched.
    /// The read order is `0..expected`, whatever order outcomes arrived in.
    pub async fn assemble(
        &self,
        outcomes: &BTreeMap<u32, ChunkOutcome<S::Handle>>,
        expected: usize,
        extension: Option<&str>,
    ) -> Result<PathBuf> {
        check_complete(outcomes, expected)?;

        let path = self
            .scratch
            .allocate(extension)
            .map_err(Error::MissingFileSaveLocation)?;

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(|source| Error::CannotWriteIntoSaveLocation {
                path: path.clone(),
                source,
            })?;
        let mut destination = BufWriter::new(file);

        let mut buf = Vec::new();
        for index in 0..expected as u32 {
            let handle = match outcomes.get(&index).map(|o| &o.status) {
                Some(ChunkStatus::Succeeded(handle)) => handle,
                _ => return Err(Error::NilReadFileHandler { index, source: None }),
            };

            buf.clear();
            let mut reader = self
                .store
                .open(handle)
                .await
                .map_err(|e| Error::NilReadFileHandler {
                    index,
                    source: Some(e),
                })?;
            reader
                .read_to_end(&mut buf)
                .await
                .map_err(|e| Error::NilReadFileHandler {
                    index,
                    source: Some(e),
                })?;

            destination
                .write_all(&buf)
                .await
                .map_err(|source| Error::CannotWriteIntoSaveLocation {
                    path: path.clone(),
                    source,
                })?;
        }

        destination
            .flush()
            .await
            .map_err(|source| Error::CannotWriteIntoSaveLocation {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), chunks = expected, "download assembled");
        Ok(path)
    }
}

fn check_complete<H>(outcomes: &BTreeMap<u32, ChunkOutcome<H>>, expected: usize) -> Result<()> {
    if let Some((index, failure)) = outcomes
        .iter()
        .find_map(|(index, o)| o.failure().map(|f| (*index, f.clone())))
    {
        return Err(Error::PartialDownloadFail {
            index,
            reason: failure,
        });
    }

    if outcomes.len() != expected {
        let index = (0..expected as u32)
            .find(|i| !outcomes.contains_key(i))
            .unwrap_or(expected as u32);
        return Err(Error::PartialDownloadFail {
            index,
            reason: ChunkFailure::Lost,
        });
    }

    Ok(())
}
