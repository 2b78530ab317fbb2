use std::fmt;

use serde::{Deserialize, Serialize};

/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle → recording → stopped
/// ```
/// `Stopped` is terminal. A stopped session cannot restart; a new session
/// must be created for the next recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Recording,
    Stopped,
}

impl SessionState {
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    /// Whether `next` is the single legal successor of this state.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Recording) | (Self::Recording, Self::Stopped)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// User-facing mode of the record component.
///
/// Changes immediately on user action; it does not wait for the host to
/// finish tearing the session down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiMode {
    #[default]
    NotRecording,
    Recording,
}

impl UiMode {
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}
