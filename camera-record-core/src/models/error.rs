use thiserror::Error;

use super::state::SessionState;

/// Errors that can occur during camera capture and recording.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not available")]
    DeviceNotAvailable,

    #[error("a recording session is already active")]
    AlreadyRecording,

    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("recorder failed: {0}")]
    RecorderFailed(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Whether the error came from the stream acquisition step.
    pub fn is_acquisition_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::DeviceNotAvailable)
    }
}
