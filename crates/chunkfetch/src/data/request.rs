use url::Url;

use crate::error::{Error, Result};

/// Default size of a single chunk: 2 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 2 * 1024 * 1024;

/// What to download and how to slice it.
///
/// Validated on construction and immutable afterwards. Only absolute
/// `http`/`https` URLs are accepted; the check never touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url:        Url,
    chunk_size: u64,
}

impl DownloadRequest {
    /// Build a request with [`DEFAULT_CHUNK_SIZE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use chunkfetch::DownloadRequest;
    ///
    /// assert!(DownloadRequest::new("https://example.com/file.zip").is_ok());
    /// assert!(DownloadRequest::new("ftp://example.com/file.zip").is_err());
    /// ```
    pub fn new(url: &str) -> Result<Self> { Self::with_chunk_size(url, DEFAULT_CHUNK_SIZE) }

    pub fn with_chunk_size(url: &str, chunk_size: u64) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(Error::UnsupportedScheme(other.to_string())),
        }

        if chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk size must be greater than 0".into()));
        }

        Ok(Self { url, chunk_size })
    }

    pub fn url(&self) -> &Url { &self.url }

    pub fn chunk_size(&self) -> u64 { self.chunk_size }

    /// File extension of the last path segment, if it has a plausible one.
    pub fn extension_hint(&self) -> Option<&str> {
        let last = self.url.path_segments()?.next_back()?;
        let (stem, ext) = last.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(DownloadRequest::new("http://example.com/a.bin").is_ok());
        assert!(DownloadRequest::new("https://example.com/a.bin").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        for url in ["ftp://example.com/a", "file:///etc/passwd", "data:text/plain,hi"] {
            match DownloadRequest::new(url) {
                Err(Error::UnsupportedScheme(_)) => {}
                other => panic!("{url}: expected UnsupportedScheme, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_rejects_relative_url() {
        assert!(matches!(
            DownloadRequest::new("/just/a/path"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_rejects_zero_chunk_size() {
        assert!(matches!(
            DownloadRequest::with_chunk_size("https://example.com/a", 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_chunk_size() {
        let req = DownloadRequest::new("https://example.com/a").unwrap();
        assert_eq!(req.chunk_size(), 2_097_152);
    }

    #[test]
    fn test_extension_hint() {
        let ext = |url: &str| {
            DownloadRequest::new(url)
                .unwrap()
                .extension_hint()
                .map(str::to_owned)
        };

        assert_eq!(ext("https://example.com/dl/archive.zip"), Some("zip".into()));
        assert_eq!(ext("https://example.com/a.tar.gz?x=1"), Some("gz".into()));
        assert_eq!(ext("https://example.com/"), None);
        assert_eq!(ext("https://example.com/README"), None);
        assert_eq!(ext("https://example.com/.hidden"), None);
        assert_eq!(ext("https://example.com/weird.ext%2F"), None);
    }
}
