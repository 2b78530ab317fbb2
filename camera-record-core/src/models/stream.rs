use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::traits::media_track::MediaTrack;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackState {
    Live,
    Ended,
}

/// A camera device the host can open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

/// Track implementation backed by an atomic liveness flag.
///
/// Backends hand the same flag to their capture thread, so stopping the
/// track ends capture.
pub struct LocalTrack {
    kind: TrackKind,
    label: String,
    live: Arc<AtomicBool>,
}

impl LocalTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Share an existing liveness flag with this track.
    pub fn with_flag(mut self, live: Arc<AtomicBool>) -> Self {
        self.live = live;
        self
    }

    pub fn live_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.live)
    }
}

impl MediaTrack for LocalTrack {
    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn state(&self) -> TrackState {
        if self.live.load(Ordering::SeqCst) {
            TrackState::Live
        } else {
            TrackState::Ended
        }
    }

    fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

/// An active camera stream handle.
///
/// Owned exclusively by the record controller from acquisition until every
/// track is stopped.
pub struct MediaStream {
    id: String,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl MediaStream {
    pub fn new(tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), tracks)
    }

    pub fn with_id(id: impl Into<String>, tracks: Vec<Arc<dyn MediaTrack>>) -> Self {
        Self { id: id.into(), tracks }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[Arc<dyn MediaTrack>] {
        &self.tracks
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &Arc<dyn MediaTrack>> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Video)
    }

    /// True while at least one track is live.
    pub fn is_active(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    /// Stop every track. Returns how many tracks were still live.
    pub fn stop_all_tracks(&self) -> usize {
        let mut stopped = 0;
        for track in &self.tracks {
            if track.is_live() {
                track.stop();
                stopped += 1;
            }
        }
        stopped
    }
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let track = LocalTrack::new(TrackKind::Video, "FaceTime HD Camera");
        assert_eq!(track.label(), "FaceTime HD Camera");

        track.stop();
        track.stop();

        assert_eq!(track.state(), TrackState::Ended);
    }

    #[test]
    fn stop_all_tracks_ends_stream() {
        let stream = MediaStream::new(vec![
            Arc::new(LocalTrack::new(TrackKind::Video, "cam")),
            Arc::new(LocalTrack::new(TrackKind::Audio, "mic")),
        ]);
        assert!(stream.is_active());
        assert_eq!(stream.video_tracks().count(), 1);

        assert_eq!(stream.stop_all_tracks(), 2);
        assert!(!stream.is_active());
        assert_eq!(stream.stop_all_tracks(), 0);
    }

    #[test]
    fn shared_flag_reflects_external_end() {
        let track = LocalTrack::new(TrackKind::Video, "cam");
        let flag = track.live_flag();
        flag.store(false, Ordering::SeqCst);
        assert!(!track.is_live());
    }
}
