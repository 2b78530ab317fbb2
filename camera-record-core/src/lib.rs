//! # camera-record-core
//!
//! Platform-agnostic camera record core.
//!
//! Previews a camera stream, records it through a host recorder, and binds
//! the finished clip to the same surface for playback. Camera access,
//! encoding and muxing belong to the host; backends implement `MediaHost`
//! and plug into the generic `RecordController`.
//!
//! ## Architecture
//!
//! ```text
//! camera-record-core (this crate)
//! ├── traits/       ← MediaHost, MediaRecorder, MediaTrack, PreviewSurface, RecorderDelegate, CaptureEncryptor
//! ├── models/       ← CaptureError, SessionState, UiMode, RecorderConfiguration, MediaStream, RecordedArtifact
//! ├── processing/   ← FragmentSequence, container sniffing
//! ├── session/      ← RecordController, RecordingSession, HeadlessSurface, EventLog
//! └── storage/      ← ArtifactWriter, AesGcmEncryptor, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::artifact::{ArtifactMetadata, RecordedArtifact};
pub use models::config::{RecorderConfiguration, StreamConstraints, SurfaceDimensions};
pub use models::diagnostics::RecordingDiagnostics;
pub use models::error::CaptureError;
pub use models::state::{SessionState, UiMode};
pub use models::stream::{CameraDevice, LocalTrack, MediaStream, TrackKind, TrackState};
pub use processing::fragment_sequence::FragmentSequence;
pub use session::controller::RecordController;
pub use session::event_log::{DelegateEvent, EventLog};
pub use session::headless_surface::HeadlessSurface;
pub use session::recording::RecordingSession;
pub use storage::aes_encryptor::AesGcmEncryptor;
pub use storage::artifact_writer::{ArtifactWriter, ExportResult};
pub use traits::encryptor::CaptureEncryptor;
pub use traits::media_host::{MediaHost, RecorderEvent, RecorderEventSender, SessionEvent, StopReason};
pub use traits::media_recorder::MediaRecorder;
pub use traits::media_track::MediaTrack;
pub use traits::preview_surface::{PreviewSurface, SurfaceBinding};
pub use traits::recorder_delegate::RecorderDelegate;
