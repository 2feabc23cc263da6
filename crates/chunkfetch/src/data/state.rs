use std::fmt;

/// Lifecycle of a single download attempt.
///
/// Idle → Probing → Planning → Fetching → Assembling → Completed, with a
/// transition to Failed allowed from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadState {
    #[default]
    Idle,
    Probing,
    Planning,
    Fetching,
    Assembling,
    Completed,
    Failed,
}

impl DownloadState {
    pub fn is_terminal(self) -> bool { matches!(self, DownloadState::Completed | DownloadState::Failed) }

    pub fn can_transition_to(self, next: DownloadState) -> bool {
        use DownloadState::*;
        match (self, next) {
            (Idle, Probing)
            | (Probing, Planning)
            | (Planning, Fetching)
            | (Fetching, Assembling)
            | (Assembling, Completed) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DownloadState::Idle => "idle",
            DownloadState::Probing => "probing",
            DownloadState::Planning => "planning",
            DownloadState::Fetching => "fetching",
            DownloadState::Assembling => "assembling",
            DownloadState::Completed => "completed",
            DownloadState::Failed => "failed",
        };
        f.write_str(s)
    }
}
