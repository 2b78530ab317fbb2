//! Real camera host built on nokhwa.
//!
//! The camera is opened and read on a dedicated thread; frames go to a
//! `FrameTap` and are recorded as-is (MJPEG when the camera delivers it).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;

use camera_record_core::models::config::{RecorderConfiguration, StreamConstraints};
use camera_record_core::models::error::CaptureError;
use camera_record_core::models::stream::{CameraDevice, LocalTrack, MediaStream, TrackKind};
use camera_record_core::traits::media_host::{MediaHost, RecorderEventSender};
use camera_record_core::traits::media_recorder::MediaRecorder;

use crate::frame_tap::{ActiveStream, FrameTap};
use crate::permissions;
use crate::recorder::TimesliceRecorder;

/// Consecutive frame read failures after which the stream counts as lost.
const MAX_FRAME_ERRORS: u32 = 30;

/// What the capture thread reports once the camera is open.
struct OpenedCamera {
    label: String,
    mime_type: String,
    width: u32,
    height: u32,
    fps: u32,
}

/// `MediaHost` for physical cameras.
#[derive(Default)]
pub struct NokhwaCameraHost {
    active: Option<ActiveStream>,
}

impl NokhwaCameraHost {
    pub fn new() -> Self {
        Self::default()
    }
}

fn camera_index(device_id: Option<&str>) -> CameraIndex {
    match device_id {
        Some(id) => match id.parse::<u32>() {
            Ok(idx) => CameraIndex::Index(idx),
            Err(_) => CameraIndex::String(id.to_string()),
        },
        None => CameraIndex::Index(0),
    }
}

fn requested_format(constraints: &StreamConstraints) -> RequestedFormat<'static> {
    let kind = match (constraints.width, constraints.height) {
        (Some(w), Some(h)) => RequestedFormatType::Closest(CameraFormat::new(
            Resolution::new(w, h),
            FrameFormat::MJPEG,
            constraints.frame_rate.unwrap_or(30),
        )),
        _ => match constraints.frame_rate {
            Some(fps) => RequestedFormatType::HighestFrameRate(fps),
            None => RequestedFormatType::AbsoluteHighestFrameRate,
        },
    };
    RequestedFormat::new::<RgbFormat>(kind)
}

fn mime_for(format: FrameFormat) -> &'static str {
    match format {
        FrameFormat::MJPEG => "video/x-motion-jpeg",
        _ => "video/x-raw",
    }
}

impl MediaHost for NokhwaCameraHost {
    fn available_devices(&self) -> Result<Vec<CameraDevice>, CaptureError> {
        let cameras = nokhwa::query(ApiBackend::Auto)
            .map_err(|e| CaptureError::Unknown(format!("failed to enumerate cameras: {}", e)))?;
        Ok(cameras
            .into_iter()
            .enumerate()
            .map(|(i, info)| CameraDevice {
                id: match info.index() {
                    CameraIndex::Index(idx) => idx.to_string(),
                    CameraIndex::String(s) => s.clone(),
                },
                name: info.human_name(),
                is_default: i == 0,
            })
            .collect())
    }

    fn acquire_stream(&mut self, constraints: &StreamConstraints) -> Result<MediaStream, CaptureError> {
        permissions::ensure_camera_access()?;
        if constraints.audio {
            log::warn!("Audio capture is not supported by the nokhwa host; recording video only");
        }

        let index = camera_index(constraints.device_id.as_deref());
        let format = requested_format(constraints);
        let tap = FrameTap::new();
        let live = Arc::new(AtomicBool::new(true));
        let (opened_tx, opened_rx) = mpsc::channel::<Result<OpenedCamera, CaptureError>>();

        let thread_tap = Arc::clone(&tap);
        let thread_live = Arc::clone(&live);
        thread::Builder::new()
            .name("nokhwa-camera".into())
            .spawn(move || {
                let mut camera = match Camera::new(index.clone(), format) {
                    Ok(c) => c,
                    Err(e) => {
                        log::error!("Failed to open camera {}: {}", index, e);
                        let _ = opened_tx.send(Err(permissions::classify_open_error(&e.to_string())));
                        return;
                    }
                };
                if let Err(e) = camera.open_stream() {
                    log::error!("Failed to open camera stream: {}", e);
                    let _ = opened_tx.send(Err(permissions::classify_open_error(&e.to_string())));
                    return;
                }

                let camera_format = camera.camera_format();
                let opened = OpenedCamera {
                    label: camera.info().human_name(),
                    mime_type: mime_for(camera_format.format()).to_string(),
                    width: camera_format.resolution().width(),
                    height: camera_format.resolution().height(),
                    fps: camera_format.frame_rate(),
                };
                if opened_tx.send(Ok(opened)).is_err() {
                    let _ = camera.stop_stream();
                    return;
                }

                let mut errors = 0u32;
                while thread_live.load(Ordering::SeqCst) {
                    match camera.frame() {
                        Ok(frame) => {
                            errors = 0;
                            thread_tap.push_frame(frame.buffer());
                        }
                        Err(e) => {
                            errors += 1;
                            log::debug!("Failed to capture frame: {}", e);
                            if errors >= MAX_FRAME_ERRORS {
                                thread_live.store(false, Ordering::SeqCst);
                                thread_tap.stream_failed(format!("camera stopped delivering frames: {}", e));
                                break;
                            }
                        }
                    }
                }

                if let Err(e) = camera.stop_stream() {
                    log::warn!("Error stopping camera stream: {}", e);
                }
                thread_tap.stream_ended();
                log::info!("Camera capture thread stopped");
            })
            .map_err(|e| CaptureError::Unknown(format!("failed to spawn camera thread: {}", e)))?;

        // Blocks until the platform grants or refuses the camera.
        let opened = opened_rx
            .recv()
            .map_err(|_| CaptureError::Unknown("camera thread exited before opening".into()))??;

        log::info!(
            "Camera '{}' opened: {}x{} @ {}fps ({})",
            opened.label,
            opened.width,
            opened.height,
            opened.fps,
            opened.mime_type
        );

        let track = LocalTrack::new(TrackKind::Video, opened.label).with_flag(live);
        let stream = MediaStream::new(vec![Arc::new(track)]);
        self.active = Some(ActiveStream {
            stream_id: stream.id().to_string(),
            tap,
            mime_type: opened.mime_type,
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

        Ok(Box::new(TimesliceRecorder::new(
            Arc::clone(&active.tap),
            events,
            config.timeslice(),
            active.mime_type.clone(),
        )))
    }
}
