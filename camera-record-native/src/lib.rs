//! # camera-record-native
//!
//! Camera host backends for camera-record-kit.
//!
//! Provides:
//! - `SyntheticCameraHost` — generated MJPEG test pattern, no hardware needed
//! - `NokhwaCameraHost` — physical cameras via nokhwa (feature `native`)
//! - `TimesliceRecorder` — recorder shared by both hosts; emits captured
//!   frames as fragments every timeslice
//! - `permissions` — camera authorization checks (feature `native`)
//!
//! ## Usage
//! ```ignore
//! use camera_record_core::{HeadlessSurface, RecordController, RecorderConfiguration};
//! use camera_record_native::SyntheticCameraHost;
//!
//! let host = SyntheticCameraHost::default();
//! let mut controller =
//!     RecordController::new(host, HeadlessSurface::default(), RecorderConfiguration::default())?;
//! controller.start_recording()?;
//! ```

pub mod frame_tap;
pub mod recorder;
pub mod synthetic;

#[cfg(feature = "native")]
pub mod nokhwa_camera;
#[cfg(feature = "native")]
pub mod permissions;

pub use frame_tap::FrameTap;
pub use recorder::TimesliceRecorder;
pub use synthetic::{SyntheticCameraHost, SyntheticCameraOptions};

#[cfg(feature = "native")]
pub use nokhwa_camera::NokhwaCameraHost;
