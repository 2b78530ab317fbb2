use std::sync::Arc;
use std::time::Duration;

use camera_record_core::models::error::CaptureError;
use camera_record_core::traits::media_host::{RecorderEventSender, StopReason};
use camera_record_core::traits::media_recorder::MediaRecorder;

use crate::frame_tap::FrameTap;

/// Recorder that turns captured frames into timesliced fragments.
///
/// Shared by every backend in this crate: the backend's capture thread feeds
/// a `FrameTap`, the recorder attaches to it on `start` and detaches on `stop`.
pub struct TimesliceRecorder {
    tap: Arc<FrameTap>,
    events: Option<RecorderEventSender>,
    timeslice: Option<Duration>,
    mime_type: String,
}

impl TimesliceRecorder {
    pub fn new(
        tap: Arc<FrameTap>,
        events: RecorderEventSender,
        timeslice: Option<Duration>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            tap,
            events: Some(events),
            timeslice,
            mime_type: mime_type.into(),
        }
    }
}

impl MediaRecorder for TimesliceRecorder {
    fn start(&mut self) -> Result<(), CaptureError> {
        let events = self
            .events
            .take()
            .ok_or_else(|| CaptureError::RecorderFailed("recorder already started".into()))?;
        self.tap.attach(events, self.timeslice)
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(events) = self.events.take() {
            // Never started: nothing was recorded, report the stop directly.
            events.stopped(StopReason::Requested);
            return Ok(());
        }
        // A false return means the stream already ended and reported its own stop.
        self.tap.detach(StopReason::Requested);
        Ok(())
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
