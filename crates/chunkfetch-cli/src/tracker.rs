use std::sync::Arc;

use chunkfetch::{DownloadState, Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const PB_STYLE: &str = "{spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Renders download progress snapshots on a terminal bar.
#[derive(Clone)]
pub struct ProgressTracker {
    pb: ProgressBar,
}

impl ProgressTracker {
    pub fn new(visible: bool) -> Self {
        let pb = if visible { ProgressBar::no_length() } else { ProgressBar::hidden() };
        if let Some(style) = PB_TEMPLATE.as_ref() {
            pb.set_style(style.clone());
        }
        ProgressTracker { pb }
    }

    pub fn update(&self, progress: &Progress) {
        if let Some(total) = progress.total_bytes {
            self.pb.set_length(total);
        }
        self.pb.set_position(progress.bytes_downloaded);

        match progress.state {
            DownloadState::Fetching => self.pb.set_message(format!(
                "{}/{} chunks",
                progress.chunks_completed, progress.chunks_total
            )),
            DownloadState::Completed | DownloadState::Failed => {}
            state => self.pb.set_message(state.to_string()),
        }
    }

    pub fn callback(&self) -> ProgressCallback {
        let tracker = self.clone();
        Arc::new(move |progress: &Progress| tracker.update(progress))
    }

    pub fn finish(&self, msg: Option<String>) {
        if let Some(msg) = msg {
            self.pb.finish_with_message(msg);
        }
        self.pb.finish();
    }

    pub fn abandon(&self) { self.pb.abandon(); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        assert!(PB_TEMPLATE.is_some());
    }

    #[test]
    fn test_update_tracks_bytes() {
        let tracker = ProgressTracker::new(false);
        tracker.update(&Progress {
            state: DownloadState::Fetching,
            chunks_completed: 1,
            chunks_total: 3,
            bytes_downloaded: 40,
            total_bytes: Some(100),
        });
        assert_eq!(tracker.pb.length(), Some(100));
        assert_eq!(tracker.pb.position(), 40);
    }
}
