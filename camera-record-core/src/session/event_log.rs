use parking_lot::Mutex;

use crate::models::artifact::RecordedArtifact;
use crate::models::error::CaptureError;
use crate::models::state::{SessionState, UiMode};
use crate::traits::recorder_delegate::RecorderDelegate;

/// A delegate notification, as recorded by `EventLog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateEvent {
    UiMode(UiMode),
    SessionState(SessionState),
    Fragment { len: usize, total: usize },
    Error(CaptureError),
    Finished { artifact_id: String, size: usize },
}

/// Delegate that logs each notification and keeps it for later inspection.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<DelegateEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DelegateEvent> {
        self.events.lock().clone()
    }

    pub fn errors(&self) -> Vec<CaptureError> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                DelegateEvent::Error(err) => Some(err.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: DelegateEvent) {
        self.events.lock().push(event);
    }
}

impl RecorderDelegate for EventLog {
    fn on_ui_mode_changed(&self, mode: UiMode) {
        log::debug!("ui mode -> {:?}", mode);
        self.push(DelegateEvent::UiMode(mode));
    }

    fn on_session_state_changed(&self, state: SessionState) {
        log::debug!("session state -> {}", state);
        self.push(DelegateEvent::SessionState(state));
    }

    fn on_fragment(&self, fragment_len: usize, total_bytes: usize) {
        self.push(DelegateEvent::Fragment {
            len: fragment_len,
            total: total_bytes,
        });
    }

    fn on_error(&self, error: &CaptureError) {
        self.push(DelegateEvent::Error(error.clone()));
    }

    fn on_recording_finished(&self, artifact: &RecordedArtifact) {
        log::info!("recording finished: {} bytes", artifact.len());
        self.push(DelegateEvent::Finished {
            artifact_id: artifact.id().to_string(),
            size: artifact.len(),
        });
    }
}
