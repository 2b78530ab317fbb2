use std::sync::Arc;

use crate::models::artifact::RecordedArtifact;
use crate::models::config::SurfaceDimensions;
use crate::models::stream::MediaStream;
use crate::traits::preview_surface::{PreviewSurface, SurfaceBinding};

/// In-memory preview surface.
///
/// Tracks the current binding and every binding change, and holds the bound
/// artifact so callers can read it back for playback or export.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    dimensions: SurfaceDimensions,
    binding: SurfaceBinding,
    artifact: Option<Arc<RecordedArtifact>>,
    playing: bool,
    history: Vec<SurfaceBinding>,
}

impl HeadlessSurface {
    pub fn new(dimensions: SurfaceDimensions) -> Self {
        Self {
            dimensions,
            ..Default::default()
        }
    }

    pub fn artifact(&self) -> Option<&Arc<RecordedArtifact>> {
        self.artifact.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Every binding the surface has held, oldest first.
    pub fn history(&self) -> &[SurfaceBinding] {
        &self.history
    }

    fn set_binding(&mut self, binding: SurfaceBinding) {
        self.history.push(binding.clone());
        self.binding = binding;
    }
}

impl PreviewSurface for HeadlessSurface {
    fn dimensions(&self) -> SurfaceDimensions {
        self.dimensions
    }

    fn binding(&self) -> SurfaceBinding {
        self.binding.clone()
    }

    fn bind_live(&mut self, stream: &MediaStream) {
        self.artifact = None;
        self.playing = false;
        self.set_binding(SurfaceBinding::LiveStream {
            stream_id: stream.id().to_string(),
        });
    }

    fn clear_live(&mut self) {
        if self.binding.is_live() {
            self.set_binding(SurfaceBinding::Empty);
        }
    }

    fn bind_artifact(&mut self, artifact: Arc<RecordedArtifact>) {
        if self.binding.is_live() {
            log::warn!("Artifact bound over a live stream; clearing live binding first");
            self.clear_live();
        }
        self.playing = false;
        self.set_binding(SurfaceBinding::Artifact {
            artifact_id: artifact.id().to_string(),
        });
        self.artifact = Some(artifact);
    }

    fn play(&mut self) {
        if self.artifact.is_some() {
            self.playing = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stream::{LocalTrack, TrackKind};
    use crate::processing::fragment_sequence::FragmentSequence;

    #[test]
    fn live_then_artifact() {
        let stream = MediaStream::with_id("s1", vec![Arc::new(LocalTrack::new(TrackKind::Video, "cam"))]);
        let mut surface = HeadlessSurface::new(SurfaceDimensions::default());

        surface.bind_live(&stream);
        assert!(!surface.controls_visible());

        let artifact = Arc::new(FragmentSequence::new().assemble("video/webm"));
        surface.clear_live();
        surface.bind_artifact(Arc::clone(&artifact));
        surface.play();

        assert!(surface.controls_visible());
        assert!(surface.is_playing());
        assert!(Arc::ptr_eq(surface.artifact().unwrap(), &artifact));
        assert_eq!(
            surface.history(),
            &[
                SurfaceBinding::LiveStream { stream_id: "s1".into() },
                SurfaceBinding::Empty,
                SurfaceBinding::Artifact {
                    artifact_id: artifact.id().to_string()
                },
            ]
        );
    }

    #[test]
    fn default_display_size_is_400_by_300() {
        let surface = HeadlessSurface::default();
        assert_eq!(surface.dimensions(), SurfaceDimensions { width: 400, height: 300 });

        let custom = HeadlessSurface::new(SurfaceDimensions { width: 640, height: 480 });
        assert_eq!(custom.dimensions().width, 640);
    }

    #[test]
    fn bind_live_drops_previous_artifact() {
        let mut surface = HeadlessSurface::default();
        surface.bind_artifact(Arc::new(FragmentSequence::new().assemble("video/webm")));
        surface.play();

        let stream = MediaStream::with_id("s2", vec![Arc::new(LocalTrack::new(TrackKind::Video, "cam"))]);
        surface.bind_live(&stream);
        assert!(surface.artifact().is_none());
        assert!(!surface.is_playing());
    }

    #[test]
    fn play_without_artifact_does_nothing() {
        let mut surface = HeadlessSurface::default();
        surface.play();
        assert!(!surface.is_playing());
        assert_eq!(surface.binding(), SurfaceBinding::Empty);
    }
}
