use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;

use super::progress::Progress;
use crate::error::{Error, Result};

/// Default number of chunk requests in flight.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Progress callback type.
pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Tuning knobs for a download.
///
/// # Examples
///
/// ```
/// use chunkfetch::DownloadOptions;
///
/// let options = DownloadOptions::default()
///     .concurrency(8)
///     .scratch_dir("/tmp/downloads")
///     .header("User-Agent", "chunkfetch/0.1");
/// assert_eq!(options.concurrency, 8);
/// ```
#[derive(Clone)]
pub struct DownloadOptions {
    /// Maximum number of ranged GET requests in flight.
    ///
    /// Default: 5
    pub concurrency: usize,

    /// Directory for chunk parts and the assembled file. Created if absent.
    ///
    /// Default: `<system temp dir>/chunkfetch`
    pub scratch_dir: PathBuf,

    /// Extra headers sent with every chunk request, next to `Range`.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Invoked on every state transition and chunk outcome.
    ///
    /// Called from the aggregation loop, so it must not block for long.
    ///
    /// Default: None
    pub on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("concurrency", &self.concurrency)
            .field("scratch_dir", &self.scratch_dir)
            .field("headers", &self.headers)
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            scratch_dir: chunkfetch_fs::ScratchDir::default_root(),
            headers:     Arc::new([]),
            on_progress: None,
        }
    }
}

impl DownloadOptions {
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Add a single header to every chunk request.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::InvalidConfig("concurrency must be greater than 0".into()));
        }
        if self.concurrency > Semaphore::MAX_PERMITS {
            return Err(Error::InvalidConfig(format!(
                "concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("range"))
        {
            return Err(Error::InvalidConfig(
                "the Range header is managed per chunk and cannot be overridden".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = DownloadOptions::default();
        assert_eq!(options.concurrency, 5);
        assert!(options.headers.is_empty());
        assert!(options.on_progress.is_none());
        assert!(options.scratch_dir.ends_with("chunkfetch"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_invalid() {
        let options = DownloadOptions::default().concurrency(0);
        assert!(matches!(options.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_concurrency_above_permit_limit_is_invalid() {
        let options = DownloadOptions::default().concurrency(usize::MAX);
        assert!(matches!(options.validate(), Err(Error::InvalidConfig(_))));

        let options = DownloadOptions::default().concurrency(Semaphore::MAX_PERMITS);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_range_header_is_reserved() {
        let options = DownloadOptions::default().header("range", "bytes=0-1");
        assert!(matches!(options.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_headers_accumulate() {
        let options = DownloadOptions::default()
            .header("A", "1")
            .header("B", "2");
        assert_eq!(options.headers.len(), 2);
        assert_eq!(options.headers[1], ("B".to_string(), "2".to_string()));
    }

    #[test]
    fn test_debug_hides_callback() {
        let options = DownloadOptions::default().on_progress(Arc::new(|_: &Progress| {}));
        assert!(format!("{options:?}").contains("{ ... }"));
    }
}
