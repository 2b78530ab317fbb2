use std::sync::Arc;

use crate::models::artifact::RecordedArtifact;
use crate::models::config::SurfaceDimensions;
use crate::models::stream::MediaStream;

/// What the surface is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SurfaceBinding {
    #[default]
    Empty,
    LiveStream { stream_id: String },
    Artifact { artifact_id: String },
}

impl SurfaceBinding {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::LiveStream { .. })
    }

    pub fn is_artifact(&self) -> bool {
        matches!(self, Self::Artifact { .. })
    }
}

/// The single visual element that previews the camera and plays recordings.
///
/// Live-stream and artifact bindings are mutually exclusive. Transport
/// controls are shown only while an artifact is bound.
pub trait PreviewSurface: Send {
    fn dimensions(&self) -> SurfaceDimensions;

    fn binding(&self) -> SurfaceBinding;

    /// Show the live camera feed.
    fn bind_live(&mut self, stream: &MediaStream);

    /// Drop the live binding, leaving the surface empty.
    fn clear_live(&mut self);

    /// Show a finalized recording. Callers clear the live binding first.
    fn bind_artifact(&mut self, artifact: Arc<RecordedArtifact>);

    /// Start playback of the bound artifact.
    fn play(&mut self);

    fn controls_visible(&self) -> bool {
        self.binding().is_artifact()
    }
}
