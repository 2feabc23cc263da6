//! Error types for chunkfetch.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Base of the numeric error codes reported by [`Error::code`].
pub const ERROR_CODE_BASE: u32 = 10_000;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported URL scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("capability probe returned no usable metadata (status {status})")]
    HeadNotSupported { status: u16 },

    #[error("server does not accept byte range requests")]
    RangeNotSupported,

    #[error("server did not report a usable content length")]
    ContentLengthNotSupported,

    #[error("network error: {0}")]
    Network(String),

    #[error("chunk {index} failed: {reason}")]
    PartialDownloadFail { index: u32, reason: ChunkFailure },

    #[error("stored data for chunk {index} is missing or unreadable")]
    NilReadFileHandler {
        index:  u32,
        #[source]
        source: Option<io::Error>,
    },

    #[error("could not allocate a save location: {0}")]
    MissingFileSaveLocation(#[source] chunkfetch_fs::Error),

    #[error("cannot write into {path}: {source}")]
    CannotWriteIntoSaveLocation {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Broad class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself was rejected before any I/O.
    Request,
    /// The resource cannot be chunk-downloaded at all.
    Capability,
    /// A network failure, surfaced verbatim.
    Transport,
    /// A chunk or the final write failed.
    Assembly,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidUrl(_) | Error::UnsupportedScheme(_) | Error::InvalidConfig(_) => {
                ErrorCategory::Request
            }
            Error::HeadNotSupported { .. }
            | Error::RangeNotSupported
            | Error::ContentLengthNotSupported => ErrorCategory::Capability,
            Error::Network(_) => ErrorCategory::Transport,
            Error::PartialDownloadFail { .. }
            | Error::NilReadFileHandler { .. }
            | Error::MissingFileSaveLocation(_)
            | Error::CannotWriteIntoSaveLocation { .. } => ErrorCategory::Assembly,
        }
    }

    /// Stable numeric code, offset from [`ERROR_CODE_BASE`].
    pub fn code(&self) -> u32 {
        let offset = match self {
            Error::HeadNotSupported { .. } => 0,
            Error::RangeNotSupported => 1,
            Error::ContentLengthNotSupported => 2,
            Error::PartialDownloadFail { .. } => 3,
            Error::NilReadFileHandler { .. } => 4,
            Error::MissingFileSaveLocation(_) => 5,
            Error::CannotWriteIntoSaveLocation { .. } => 6,
            Error::Network(_) => 7,
            Error::InvalidUrl(_) => 8,
            Error::UnsupportedScheme(_) => 9,
            Error::InvalidConfig(_) => 10,
        };
        ERROR_CODE_BASE + offset
    }

    /// Short machine-readable name, e.g. `range_not_supported`.
    pub fn name(&self) -> &'static str {
        match self {
            Error::HeadNotSupported { .. } => "head_not_supported",
            Error::RangeNotSupported => "range_not_supported",
            Error::ContentLengthNotSupported => "content_length_not_supported",
            Error::PartialDownloadFail { .. } => "partial_download_fail",
            Error::NilReadFileHandler { .. } => "nil_read_file_handler",
            Error::MissingFileSaveLocation(_) => "missing_file_save_location",
            Error::CannotWriteIntoSaveLocation { .. } => "cannot_write_into_save_location",
            Error::Network(_) => "network",
            Error::InvalidUrl(_) => "invalid_url",
            Error::UnsupportedScheme(_) => "unsupported_scheme",
            Error::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Why a single chunk did not produce stored data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkFailure {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("expected 206 Partial Content, got status {0}")]
    UnexpectedStatus(u16),

    #[error("response body could not be read: {0}")]
    Body(String),

    #[error("temporary store failed: {0}")]
    Store(String),

    #[error("expected {expected} bytes, received {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("not started because an earlier chunk failed")]
    NotStarted,

    #[error("worker exited without reporting")]
    Lost,
}

pub type Result<T> = std::result::Result<T, Error>;
