use std::sync::mpsc;

use crate::models::config::{RecorderConfiguration, StreamConstraints};
use crate::models::error::CaptureError;
use crate::models::stream::{CameraDevice, MediaStream};
use crate::traits::media_recorder::MediaRecorder;

/// Why a recorder stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// `stop()` was called on the recorder.
    Requested,
    /// The underlying stream ended (device unplugged, track stopped elsewhere).
    StreamEnded,
    /// The host recorder hit an error and gave up.
    Failed(String),
}

/// Notification emitted by a host recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderEvent {
    /// A chunk of recorded data. May be empty; the controller drops empty chunks.
    DataAvailable(Vec<u8>),
    /// Terminal notification. Sent exactly once per recorder, after its last chunk.
    Stopped(StopReason),
}

/// A recorder event tagged with the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub session_id: u64,
    pub event: RecorderEvent,
}

/// Sending half of the single-consumer event channel, bound to one session.
///
/// Host recorders keep a clone on their capture thread. Sends after the
/// controller went away are silently dropped.
#[derive(Debug, Clone)]
pub struct RecorderEventSender {
    session_id: u64,
    tx: mpsc::Sender<SessionEvent>,
}

impl RecorderEventSender {
    pub fn new(session_id: u64, tx: mpsc::Sender<SessionEvent>) -> Self {
        Self { session_id, tx }
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Returns false when the receiving controller has been dropped.
    pub fn send(&self, event: RecorderEvent) -> bool {
        self.tx
            .send(SessionEvent {
                session_id: self.session_id,
                event,
            })
            .is_ok()
    }

    pub fn data_available(&self, data: Vec<u8>) -> bool {
        self.send(RecorderEvent::DataAvailable(data))
    }

    pub fn stopped(&self, reason: StopReason) -> bool {
        self.send(RecorderEvent::Stopped(reason))
    }
}

/// Host platform capability: camera access plus a recorder factory.
///
/// Implemented by:
/// - `SyntheticCameraHost` (test pattern, always available)
/// - `NokhwaCameraHost` (real cameras, `native` feature)
pub trait MediaHost: Send {
    /// Cameras the host can open.
    fn available_devices(&self) -> Result<Vec<CameraDevice>, CaptureError>;

    /// Request a camera stream.
    ///
    /// Blocks until the user or platform grants or denies access. There is
    /// no timeout. Fails with `PermissionDenied` or `DeviceNotAvailable`.
    fn acquire_stream(&mut self, constraints: &StreamConstraints) -> Result<MediaStream, CaptureError>;

    /// Create a recorder bound to `stream`. The recorder starts idle and
    /// reports through `events`.
    fn create_recorder(
        &mut self,
        stream: &MediaStream,
        config: &RecorderConfiguration,
        events: RecorderEventSender,
    ) -> Result<Box<dyn MediaRecorder>, CaptureError>;
}
