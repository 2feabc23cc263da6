use super::state::DownloadState;

/// Snapshot of a download, handed to progress callbacks.
///
/// A snapshot is emitted on every state transition and after every chunk
/// outcome, so `chunks_completed` counts chunks with a terminal outcome,
/// successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    /// Current state of the download.
    pub state: DownloadState,

    /// Chunks that reported an outcome.
    pub chunks_completed: u32,

    /// Planned chunk count, known once planning is done.
    pub chunks_total: u32,

    /// Bytes stored by successful chunks.
    pub bytes_downloaded: u64,

    /// Resource size, known once the probe succeeded.
    pub total_bytes: Option<u64>,
}

impl Progress {
    /// Completion as a percentage in `0.0..=100.0`, if the total is known.
    ///
    /// A zero-length resource reports 100% once known.
    pub fn percentage(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) => Some(100.0),
            Some(total) => Some(self.bytes_downloaded as f64 / total as f64 * 100.0),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_unknown_total() {
        assert_eq!(Progress::default().percentage(), None);
    }

    #[test]
    fn test_percentage_half() {
        let p = Progress {
            bytes_downloaded: 50,
            total_bytes: Some(200),
            ..Default::default()
        };
        assert_eq!(p.percentage(), Some(25.0));
    }

    #[test]
    fn test_percentage_empty_resource() {
        let p = Progress {
            total_bytes: Some(0),
            ..Default::default()
        };
        assert_eq!(p.percentage(), Some(100.0));
    }
}
