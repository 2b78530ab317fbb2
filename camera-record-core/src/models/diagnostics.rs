/// Counters for debugging record controllers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingDiagnostics {
    pub sessions_started: u64,
    pub sessions_finished: u64,
    pub fragments_received: u64,
    pub empty_fragments_dropped: u64,
    /// Fragments that arrived while the session was not recording.
    pub fragments_rejected: u64,
    /// Events from a session that is no longer current.
    pub stale_events: u64,
    pub bytes_accumulated: u64,
}
