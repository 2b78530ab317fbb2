use crate::models::artifact::RecordedArtifact;
use crate::models::error::CaptureError;
use crate::models::state::{SessionState, UiMode};

/// Event delegate for record controller notifications.
///
/// All methods are called on the thread that owns the controller.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the user-facing mode flips.
    fn on_ui_mode_changed(&self, mode: UiMode);

    /// Called on every session state transition.
    fn on_session_state_changed(&self, state: SessionState);

    /// Called for each non-empty fragment appended to the current recording.
    fn on_fragment(&self, fragment_len: usize, total_bytes: usize) {
        let _ = (fragment_len, total_bytes);
    }

    /// Called when starting fails or the host recorder reports a failure.
    fn on_error(&self, error: &CaptureError);

    /// Called once the artifact is assembled and bound to the surface.
    fn on_recording_finished(&self, artifact: &RecordedArtifact);
}
