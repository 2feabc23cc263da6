use crate::error::ChunkFailure;

/// What the capability probe learned about the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub total_length:    u64,
    pub range_supported: bool,
}

/// A contiguous byte range of the resource, fetched by one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk index (0-based)
    pub index:   u32,
    /// First byte offset
    pub start:   u64,
    /// Last byte offset (inclusive)
    pub end:     u64,
    /// The computed end ran past the resource and was clamped.
    pub clamped: bool,
}

impl Chunk {
    /// Byte count; a planned chunk always covers at least one byte.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 { self.end - self.start + 1 }
}

/// Terminal result of fetching one chunk.
#[derive(Debug)]
pub enum ChunkStatus<H> {
    Succeeded(H),
    Failed(ChunkFailure),
}

#[derive(Debug)]
pub struct ChunkOutcome<H> {
    pub index:  u32,
    pub status: ChunkStatus<H>,
}

impl<H> ChunkOutcome<H> {
    pub fn succeeded(index: u32, handle: H) -> Self {
        Self {
            index,
            status: ChunkStatus::Succeeded(handle),
        }
    }

    pub fn failed(index: u32, failure: ChunkFailure) -> Self {
        Self {
            index,
            status: ChunkStatus::Failed(failure),
        }
    }

    pub fn is_success(&self) -> bool { matches!(self.status, ChunkStatus::Succeeded(_)) }

    pub fn failure(&self) -> Option<&ChunkFailure> {
        match &self.status {
            ChunkStatus::Failed(f) => Some(f),
            ChunkStatus::Succeeded(_) => None,
        }
    }
}
