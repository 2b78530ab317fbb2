use crate::models::stream::{TrackKind, TrackState};

/// A single track of a camera stream.
///
/// Stopping a track releases the hardware behind it. `stop` must be
/// idempotent: stopping an already-ended track does nothing.
pub trait MediaTrack: Send + Sync {
    fn kind(&self) -> TrackKind;

    /// Human readable device label (e.g. "FaceTime HD Camera").
    fn label(&self) -> &str;

    fn state(&self) -> TrackState;

    fn stop(&self);

    fn is_live(&self) -> bool {
        self.state() == TrackState::Live
    }
}
