//! Synthetic camera host.
//!
//! Produces deterministic MJPEG-framed test patterns on a dedicated thread,
//! so the whole record pipeline can run without camera hardware.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use camera_record_core::models::config::{RecorderConfiguration, StreamConstraints};
use camera_record_core::models::error::CaptureError;
use camera_record_core::models::stream::{CameraDevice, LocalTrack, MediaStream, TrackKind};
use camera_record_core::traits::media_host::{MediaHost, RecorderEventSender};
use camera_record_core::traits::media_recorder::MediaRecorder;

use crate::frame_tap::{ActiveStream, FrameTap};
use crate::recorder::TimesliceRecorder;

pub const SYNTHETIC_DEVICE_ID: &str = "synthetic-0";
pub const SYNTHETIC_MIME_TYPE: &str = "video/x-motion-jpeg";

/// Behaviour of the synthetic camera.
#[derive(Debug, Clone)]
pub struct SyntheticCameraOptions {
    /// Frames per second when the constraints don't ask for a rate.
    pub frame_rate: u32,

    /// Payload bytes per frame, excluding the JPEG markers.
    pub frame_size: usize,

    /// When false, `acquire_stream` fails with `PermissionDenied`.
    pub permission_granted: bool,

    /// When false, the host reports no devices and acquisition fails with
    /// `DeviceNotAvailable`.
    pub device_present: bool,

    /// End the stream on its own after this many frames, as if the camera
    /// was unplugged.
    pub max_frames: Option<u64>,
}

impl Default for SyntheticCameraOptions {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            frame_size: 256,
            permission_granted: true,
            device_present: true,
            max_frames: None,
        }
    }
}

/// `MediaHost` backed by a generated test pattern.
pub struct SyntheticCameraHost {
    options: SyntheticCameraOptions,
    active: Option<ActiveStream>,
}

impl SyntheticCameraHost {
    pub fn new(options: SyntheticCameraOptions) -> Self {
        Self { options, active: None }
    }
}

impl Default for SyntheticCameraHost {
    fn default() -> Self {
        Self::new(SyntheticCameraOptions::default())
    }
}

/// Build frame `index`: JPEG SOI marker, big-endian index, pattern, EOI marker.
pub fn synthetic_frame(index: u64, payload_len: usize) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload_len + 14);
    frame.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
    frame.extend_from_slice(&index.to_be_bytes());
    frame.extend((0..payload_len).map(|i| (index as usize).wrapping_add(i) as u8));
    frame.extend_from_slice(&[0xFF, 0xD9]);
    frame
}

impl MediaHost for SyntheticCameraHost {
    fn available_devices(&self) -> Result<Vec<CameraDevice>, CaptureError> {
        if !self.options.device_present {
            return Ok(Vec::new());
        }
        Ok(vec![CameraDevice {
            id: SYNTHETIC_DEVICE_ID.into(),
            name: "Synthetic Camera".into(),
            is_default: true,
        }])
    }

    fn acquire_stream(&mut self, constraints: &StreamConstraints) -> Result<MediaStream, CaptureError> {
        if !self.options.device_present {
            return Err(CaptureError::DeviceNotAvailable);
        }
        if let Some(ref id) = constraints.device_id {
            if id != SYNTHETIC_DEVICE_ID {
                return Err(CaptureError::DeviceNotAvailable);
            }
        }
        if !self.options.permission_granted {
            return Err(CaptureError::PermissionDenied);
        }
        if constraints.audio {
            log::warn!("Synthetic camera has no audio; ignoring audio constraint");
        }

        let fps = constraints.frame_rate.unwrap_or(self.options.frame_rate).max(1);
        let frame_interval = Duration::from_secs_f64(1.0 / fps as f64);
        let frame_size = self.options.frame_size;
        let max_frames = self.options.max_frames;

        let tap = FrameTap::new();
        let track = LocalTrack::new(TrackKind::Video, "Synthetic Camera");
        let live = track.live_flag();

        let thread_tap = Arc::clone(&tap);
        let thread_live: Arc<AtomicBool> = Arc::clone(&live);
        thread::Builder::new()
            .name("synthetic-camera".into())
            .spawn(move || {
                let mut index = 0u64;
                while thread_live.load(Ordering::SeqCst) {
                    thread_tap.push_frame(&synthetic_frame(index, frame_size));
                    index += 1;
                    if max_frames.is_some_and(|max| index >= max) {
                        thread_live.store(false, Ordering::SeqCst);
                        break;
                    }
                    thread::sleep(frame_interval);
                }
                thread_tap.stream_ended();
                log::debug!("Synthetic camera stopped after {} frame(s)", index);
            })
            .map_err(|e| CaptureError::Unknown(format!("failed to spawn camera thread: {}", e)))?;

        let stream = MediaStream::new(vec![Arc::new(track)]);
        log::info!("Synthetic camera streaming at {} fps", fps);

        self.active = Some(ActiveStream {
            stream_id: stream.id().to_string(),
            tap,
            mime_type: SYNTHETIC_MIME_TYPE.into(),
        });
        Ok(stream)
    }

    fn create_recorder(
        &mut self,
        stream: &MediaStream,
        config: &RecorderConfiguration,
        events: RecorderEventSender,
    ) -> Result<Box<dyn MediaRecorder>, CaptureError> {
        let active = self
            .active
            .as_ref()
            .filter(|a| a.stream_id == stream.id())
            .ok_or_else(|| CaptureError::RecorderFailed("stream was not acquired from this host".into()))?;

        if config.mime_type != active.mime_type {
            log::debug!(
                "Requested {} but synthetic camera records {}",
                config.mime_type,
                active.mime_type
            );
        }

        Ok(Box::new(TimesliceRecorder::new(
            Arc::clone(&active.tap),
            events,
            config.timeslice(),
            active.mime_type.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use camera_record_core::processing::container::{self, ContainerKind};
    use camera_record_core::{HeadlessSurface, RecordController, UiMode};

    fn controller(options: SyntheticCameraOptions, timeslice_ms: Option<u64>) -> RecordController<SyntheticCameraHost, HeadlessSurface> {
        let config = RecorderConfiguration {
            timeslice_ms,
            ..Default::default()
        };
        RecordController::new(SyntheticCameraHost::new(options), HeadlessSurface::default(), config).unwrap()
    }

    #[test]
    fn frame_layout() {
        let frame = synthetic_frame(2, 4);
        assert_eq!(frame.len(), 4 + 8 + 4 + 2);
        assert_eq!(container::detect(&frame), ContainerKind::MotionJpeg);
        assert_eq!(&frame[4..12], &2u64.to_be_bytes());
        assert_eq!(&frame[frame.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn denied_permission() {
        let options = SyntheticCameraOptions {
            permission_granted: false,
            ..Default::default()
        };
        let mut c = controller(options, None);
        assert_eq!(c.start_recording().unwrap_err(), CaptureError::PermissionDenied);
        assert_eq!(c.ui_mode(), UiMode::NotRecording);
    }

    #[test]
    fn no_device() {
        let options = SyntheticCameraOptions {
            device_present: false,
            ..Default::default()
        };
        let host = SyntheticCameraHost::new(options.clone());
        assert!(host.available_devices().unwrap().is_empty());

        let mut c = controller(options, None);
        assert_eq!(c.start_recording().unwrap_err(), CaptureError::DeviceNotAvailable);
    }

    #[test]
    fn records_whole_frames() {
        let options = SyntheticCameraOptions {
            frame_rate: 200,
            frame_size: 16,
            ..Default::default()
        };
        let mut c = controller(options, Some(10));
        c.start_recording().unwrap();

        let started = Instant::now();
        while c.diagnostics().fragments_received < 2 && started.elapsed() < Duration::from_secs(5) {
            c.process_events();
            thread::sleep(Duration::from_millis(5));
        }
        c.stop_recording().unwrap();

        let artifact = c.wait_for_stop(Duration::from_secs(5)).expect("artifact");
        let frame_len = synthetic_frame(0, 16).len();
        assert!(!artifact.is_empty());
        assert_eq!(artifact.len() % frame_len, 0);
        assert_eq!(container::detect(artifact.data()), ContainerKind::MotionJpeg);
        assert_eq!(artifact.mime_type(), SYNTHETIC_MIME_TYPE);
        assert!(artifact.fragment_count() >= 2);
        assert!(c.surface().is_playing());
    }

    #[test]
    fn camera_unplug_finalizes_recording() {
        let options = SyntheticCameraOptions {
            frame_rate: 100,
            frame_size: 8,
            max_frames: Some(5),
            ..Default::default()
        };
        let mut c = controller(options, None);
        c.start_recording().unwrap();

        let artifact = c.wait_for_stop(Duration::from_secs(5)).expect("artifact");
        assert!(artifact.len() <= 5 * synthetic_frame(0, 8).len());
        assert!(!c.is_recording());
    }

    #[test]
    fn foreign_stream_is_rejected() {
        let mut host = SyntheticCameraHost::default();
        let foreign = MediaStream::new(Vec::new());
        let (tx, _rx) = std::sync::mpsc::channel();
        let result = host.create_recorder(&foreign, &RecorderConfiguration::default(), RecorderEventSender::new(1, tx));
        assert!(matches!(result, Err(CaptureError::RecorderFailed(_))));
    }
}
