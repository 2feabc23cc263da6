//! Filesystem side of chunked downloads: a scratch directory that is created
//! on demand and hands out uniquely named files.

mod error;
mod scratch;

pub use error::{Error, Result};
pub use scratch::ScratchDir;
