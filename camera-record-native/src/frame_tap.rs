use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use camera_record_core::models::error::CaptureError;
use camera_record_core::traits::media_host::{RecorderEventSender, StopReason};

/// Where a capture thread delivers frames for recording.
///
/// The capture thread pushes every frame; while a recorder is attached the
/// frames are accumulated and flushed as `DataAvailable` fragments. Detaching
/// flushes what is left and sends the single `Stopped` notification.
#[derive(Default)]
pub struct FrameTap {
    sink: Mutex<Option<TapSink>>,
    ended: AtomicBool,
}

struct TapSink {
    events: RecorderEventSender,
    pending: Vec<u8>,
    timeslice: Option<Duration>,
    last_flush: Instant,
    frames: u64,
}

impl TapSink {
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let chunk = mem::take(&mut self.pending);
        self.events.data_available(chunk);
        self.last_flush = Instant::now();
    }
}

impl FrameTap {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_attached(&self) -> bool {
        self.sink.lock().is_some()
    }

    pub(crate) fn attach(
        &self,
        events: RecorderEventSender,
        timeslice: Option<Duration>,
    ) -> Result<(), CaptureError> {
        let mut sink = self.sink.lock();
        if sink.is_some() {
            return Err(CaptureError::RecorderFailed("a recorder is already attached".into()));
        }
        if self.ended.load(Ordering::SeqCst) {
            // The camera went away before recording began.
            events.stopped(StopReason::StreamEnded);
            return Ok(());
        }
        *sink = Some(TapSink {
            events,
            pending: Vec::new(),
            timeslice,
            last_flush: Instant::now(),
            frames: 0,
        });
        Ok(())
    }

    /// Called by the capture thread for each captured frame.
    pub fn push_frame(&self, frame: &[u8]) {
        let mut guard = self.sink.lock();
        let Some(sink) = guard.as_mut() else {
            return;
        };
        sink.pending.extend_from_slice(frame);
        sink.frames += 1;
        if let Some(timeslice) = sink.timeslice {
            if sink.last_flush.elapsed() >= timeslice {
                sink.flush();
            }
        }
    }

    /// Flush and send `Stopped`. Returns false if no recorder was attached,
    /// so the notification is sent at most once per attach.
    pub(crate) fn detach(&self, reason: StopReason) -> bool {
        let Some(mut sink) = self.sink.lock().take() else {
            return false;
        };
        sink.flush();
        log::debug!(
            "Recorder for session {} detached after {} frame(s) ({:?})",
            sink.events.session_id(),
            sink.frames,
            reason
        );
        sink.events.stopped(reason);
        true
    }

    /// Called by the capture thread when the camera stops delivering frames.
    pub fn stream_ended(&self) {
        self.ended.store(true, Ordering::SeqCst);
        if self.detach(StopReason::StreamEnded) {
            log::warn!("Camera stream ended while recording");
        }
    }

    /// Called by the capture thread when the camera failed mid-stream.
    pub fn stream_failed(&self, message: String) {
        self.ended.store(true, Ordering::SeqCst);
        self.detach(StopReason::Failed(message));
    }
}

/// Book-keeping a host keeps for the stream it handed out last.
pub(crate) struct ActiveStream {
    pub stream_id: String,
    pub tap: Arc<FrameTap>,
    pub mime_type: String,
}
