use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::artifact::RecordedArtifact;
use crate::models::config::RecorderConfiguration;
use crate::models::diagnostics::RecordingDiagnostics;
use crate::models::error::CaptureError;
use crate::models::state::{SessionState, UiMode};
use crate::processing::container;
use crate::session::recording::{FragmentOutcome, RecordingSession};
use crate::traits::media_host::{MediaHost, RecorderEvent, RecorderEventSender, SessionEvent, StopReason};
use crate::traits::preview_surface::PreviewSurface;
use crate::traits::recorder_delegate::RecorderDelegate;

/// Capture/record controller.
///
/// Owns the host, the preview surface, and at most one recording session
/// (which in turn owns the stream handle and the fragments). Host recorders
/// report on a single-consumer channel; the owner drains it with
/// `process_events` or `wait_for_stop` on the same thread that calls
/// `start_recording` / `stop_recording`.
///
/// ```text
/// start_recording → acquire stream → create recorder → start → bind live
///        [DataAvailable]* ─→ append fragment
/// stop_recording → recorder.stop ─→ [Stopped] → assemble → bind artifact → play → release tracks
/// ```
pub struct RecordController<H: MediaHost, P: PreviewSurface> {
    host: H,
    surface: P,
    config: RecorderConfiguration,
    ui_mode: UiMode,
    session: Option<RecordingSession>,
    next_session_id: u64,
    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
    last_artifact: Option<Arc<RecordedArtifact>>,
    diagnostics: RecordingDiagnostics,
    delegate: Option<Arc<dyn RecorderDelegate>>,
}

impl<H: MediaHost, P: PreviewSurface> RecordController<H, P> {
    pub fn new(host: H, surface: P, config: RecorderConfiguration) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        let (events_tx, events_rx) = mpsc::channel();
        Ok(Self {
            host,
            surface,
            config,
            ui_mode: UiMode::NotRecording,
            session: None,
            next_session_id: 1,
            events_tx,
            events_rx,
            last_artifact: None,
            diagnostics: RecordingDiagnostics::default(),
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn ui_mode(&self) -> UiMode {
        self.ui_mode
    }

    /// State of the current session, None when no session is live.
    pub fn session_state(&self) -> Option<SessionState> {
        self.session.as_ref().map(|s| s.state())
    }

    /// True while a session exists, including one that was asked to stop but
    /// whose stop notification has not been processed yet.
    pub fn has_active_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.ui_mode.is_recording()
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn last_artifact(&self) -> Option<&Arc<RecordedArtifact>> {
        self.last_artifact.as_ref()
    }

    pub fn diagnostics(&self) -> RecordingDiagnostics {
        self.diagnostics.clone()
    }

    /// Acquire the camera and begin recording.
    ///
    /// Blocks while the host asks for camera access. Acquisition failures are
    /// logged, reported to the delegate, and returned; the UI stays in
    /// `NotRecording` and no session is created.
    pub fn start_recording(&mut self) -> Result<(), CaptureError> {
        self.process_events();
        if self.session.is_some() {
            return Err(CaptureError::AlreadyRecording);
        }

        let stream = match self.host.acquire_stream(&self.config.constraints) {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("Error accessing camera: {}", e);
                self.notify_error(&e);
                return Err(e);
            }
        };
        let labels: Vec<&str> = stream.tracks().iter().map(|t| t.label()).collect();
        log::info!("Acquired camera stream {} [{}]", stream.id(), labels.join(", "));

        let session_id = self.next_session_id;
        self.next_session_id += 1;
        let sender = RecorderEventSender::new(session_id, self.events_tx.clone());

        let recorder = match self.host.create_recorder(&stream, &self.config, sender) {
            Ok(recorder) => recorder,
            Err(e) => {
                log::error!("Failed to create recorder: {}", e);
                stream.stop_all_tracks();
                self.notify_error(&e);
                return Err(e);
            }
        };

        let mut session = RecordingSession::new(session_id, stream, recorder);
        if let Err(e) = session.start() {
            log::error!("Failed to start recorder: {}", e);
            session.release_stream();
            self.notify_error(&e);
            return Err(e);
        }

        self.diagnostics.sessions_started += 1;
        self.notify_session_state(SessionState::Recording);
        self.surface.bind_live(session.stream());
        let dims = self.surface.dimensions();
        log::debug!("Live preview bound at {}x{}", dims.width, dims.height);
        self.session = Some(session);
        self.set_ui_mode(UiMode::Recording);

        log::info!("Recording session {} started", session_id);
        Ok(())
    }

    /// Ask the current session to stop.
    ///
    /// The UI flips to `NotRecording` right away; the artifact is assembled
    /// when the host's stop notification is processed. Without an active
    /// session this is a no-op.
    pub fn stop_recording(&mut self) -> Result<(), CaptureError> {
        let Some(session) = self.session.as_mut() else {
            log::debug!("stop_recording called without an active session");
            return Ok(());
        };

        let result = session.request_stop();
        self.set_ui_mode(UiMode::NotRecording);

        if let Err(e) = result {
            // The host cannot deliver a stop notification; finish locally so
            // the tracks are still released.
            log::warn!("Recorder failed to stop, finalizing locally: {}", e);
            self.notify_error(&e);
            self.finish_session();
            return Err(e);
        }
        Ok(())
    }

    /// Handle every pending host notification without blocking.
    /// Returns the number of notifications handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events_rx.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    /// Block until the current session has been finalized or `timeout`
    /// elapses. Returns the artifact if finalization happened during the call.
    pub fn wait_for_stop(&mut self, timeout: Duration) -> Option<Arc<RecordedArtifact>> {
        let deadline = Instant::now() + timeout;
        while self.session.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events_rx.recv_timeout(remaining) {
                Ok(event) => {
                    if let Some(artifact) = self.handle_event(event) {
                        return Some(artifact);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    log::warn!("Timed out waiting for recorder to stop");
                    return None;
                }
            }
        }
        None
    }

    fn handle_event(&mut self, event: SessionEvent) -> Option<Arc<RecordedArtifact>> {
        let current = self.session.as_ref().map(|s| s.id());
        if current != Some(event.session_id) {
            self.diagnostics.stale_events += 1;
            log::debug!("Ignoring event from stale session {}", event.session_id);
            return None;
        }

        match event.event {
            RecorderEvent::DataAvailable(data) => {
                self.on_data_available(data);
                None
            }
            RecorderEvent::Stopped(reason) => {
                match reason {
                    StopReason::Requested => {}
                    StopReason::StreamEnded => log::warn!("Camera stream ended; finalizing recording"),
                    StopReason::Failed(msg) => {
                        let error = CaptureError::RecorderFailed(msg);
                        log::error!("{}", error);
                        self.notify_error(&error);
                    }
                }
                self.finish_session()
            }
        }
    }

    fn on_data_available(&mut self, data: Vec<u8>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let len = data.len();
        self.diagnostics.fragments_received += 1;

        match session.append(data) {
            FragmentOutcome::Appended => {
                self.diagnostics.bytes_accumulated += len as u64;
                let total = session.total_bytes();
                if let Some(ref delegate) = self.delegate {
                    delegate.on_fragment(len, total);
                }
            }
            FragmentOutcome::Empty => self.diagnostics.empty_fragments_dropped += 1,
            FragmentOutcome::Rejected => {
                self.diagnostics.fragments_rejected += 1;
                log::warn!("Dropped fragment received outside recording state");
            }
        }
    }

    /// Assemble the artifact, swap the surface to playback, release the stream.
    fn finish_session(&mut self) -> Option<Arc<RecordedArtifact>> {
        let mut session = self.session.take()?;

        let artifact = match session.finalize() {
            Ok(artifact) => Arc::new(artifact),
            Err(e) => {
                log::error!("Failed to finalize session {}: {}", session.id(), e);
                session.release_stream();
                self.set_ui_mode(UiMode::NotRecording);
                self.notify_error(&e);
                return None;
            }
        };
        self.notify_session_state(SessionState::Stopped);

        if !container::matches_mime(artifact.data(), artifact.mime_type()) {
            log::warn!(
                "Artifact content does not look like {} (detected {:?})",
                artifact.mime_type(),
                container::detect(artifact.data())
            );
        }

        self.surface.clear_live();
        self.surface.bind_artifact(Arc::clone(&artifact));
        self.surface.play();

        let released = session.release_stream();
        log::info!(
            "Recording session {} finished after {:.2}s: {} fragment(s), {} bytes, {} track(s) released",
            session.id(),
            session.elapsed().as_secs_f64(),
            artifact.fragment_count(),
            artifact.len(),
            released
        );

        self.diagnostics.sessions_finished += 1;
        self.last_artifact = Some(Arc::clone(&artifact));
        self.set_ui_mode(UiMode::NotRecording);

        if let Some(ref delegate) = self.delegate {
            delegate.on_recording_finished(&artifact);
        }
        Some(artifact)
    }

    fn set_ui_mode(&mut self, mode: UiMode) {
        if self.ui_mode == mode {
            return;
        }
        self.ui_mode = mode;
        if let Some(ref delegate) = self.delegate {
            delegate.on_ui_mode_changed(mode);
        }
    }

    fn notify_session_state(&self, state: SessionState) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_session_state_changed(state);
        }
    }

    fn notify_error(&self, error: &CaptureError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }
}

impl<H: MediaHost, P: PreviewSurface> Drop for RecordController<H, P> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let released = session.release_stream();
            log::debug!("Released {} track(s) of unfinished session {}", released, session.id());
        }
    }
}
