use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("retry limit exceeded")]
    RetryLimitExceeded,

    #[error("failed to create scratch directory {path}: {source}")]
    CreateDir {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to allocate {path}: {source}")]
    Allocate {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file extension: {0:?}")]
    InvalidExtension(String),
}

pub type Result<T> = std::result::Result<T, Error>;
