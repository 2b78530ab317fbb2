use std::mem;
use std::time::{Duration, Instant};

use crate::models::artifact::RecordedArtifact;
use crate::models::error::CaptureError;
use crate::models::state::SessionState;
use crate::models::stream::MediaStream;
use crate::processing::fragment_sequence::FragmentSequence;
use crate::traits::media_recorder::MediaRecorder;

/// What happened to a fragment handed to `RecordingSession::append`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentOutcome {
    Appended,
    /// Zero-length fragment, dropped.
    Empty,
    /// Session was not recording.
    Rejected,
}

/// One recording: a host recorder, the stream it is bound to, and the
/// fragments it has produced.
///
/// Single use. Once `finalize` moves the session to `Stopped` it cannot
/// record again.
pub struct RecordingSession {
    id: u64,
    state: SessionState,
    stream: MediaStream,
    recorder: Box<dyn MediaRecorder>,
    fragments: FragmentSequence,
    stop_requested: bool,
    started_at: Option<Instant>,
}

impl RecordingSession {
    pub fn new(id: u64, stream: MediaStream, recorder: Box<dyn MediaRecorder>) -> Self {
        Self {
            id,
            state: SessionState::Idle,
            stream,
            recorder,
            fragments: FragmentSequence::new(),
            stop_requested: false,
            started_at: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stream(&self) -> &MediaStream {
        &self.stream
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.fragments.total_bytes()
    }

    /// Time since `start`, zero if not started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Start the host recorder. Transitions: idle → recording.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.check_transition(SessionState::Recording)?;
        self.recorder.start()?;
        self.state = SessionState::Recording;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    /// Ask the host recorder to stop. The session stays `Recording` until the
    /// stop notification is processed, so trailing data is still accepted.
    ///
    /// Returns false when there was nothing to do (not recording, or a stop
    /// was already requested).
    pub fn request_stop(&mut self) -> Result<bool, CaptureError> {
        if !self.state.is_recording() || self.stop_requested {
            return Ok(false);
        }
        self.stop_requested = true;
        self.recorder.stop()?;
        Ok(true)
    }

    pub fn append(&mut self, fragment: Vec<u8>) -> FragmentOutcome {
        if !self.state.is_recording() {
            return FragmentOutcome::Rejected;
        }
        if self.fragments.push(fragment) {
            FragmentOutcome::Appended
        } else {
            FragmentOutcome::Empty
        }
    }

    /// Assemble the artifact from every fragment. Transitions: recording → stopped.
    pub fn finalize(&mut self) -> Result<RecordedArtifact, CaptureError> {
        self.check_transition(SessionState::Stopped)?;
        self.state = SessionState::Stopped;
        let fragments = mem::take(&mut self.fragments);
        Ok(fragments.assemble(self.recorder.mime_type()))
    }

    /// Stop every track of the bound stream. Returns how many were live.
    pub fn release_stream(&self) -> usize {
        self.stream.stop_all_tracks()
    }

    fn check_transition(&self, next: SessionState) -> Result<(), CaptureError> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(CaptureError::InvalidTransition {
                from: self.state,
                to: next,
            })
        }
    }
}
