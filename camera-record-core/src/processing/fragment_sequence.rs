use crate::models::artifact::RecordedArtifact;

/// Append-only sequence of recorded data fragments.
///
/// Fragments are kept in arrival order and concatenated in that order when
/// the artifact is assembled. Empty fragments are discarded on push.
/// Assembly consumes the sequence, so it can happen only once.
#[derive(Debug, Default)]
pub struct FragmentSequence {
    fragments: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl FragmentSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment. Returns false when the fragment was empty and dropped.
    pub fn push(&mut self, fragment: Vec<u8>) -> bool {
        if fragment.is_empty() {
            return false;
        }
        self.total_bytes += fragment.len();
        self.fragments.push(fragment);
        true
    }

    /// Number of fragments held.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Sum of all fragment sizes in bytes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Concatenate every fragment, in order, into an artifact.
    pub fn assemble(self, mime_type: &str) -> RecordedArtifact {
        let count = self.fragments.len();
        let mut data = Vec::with_capacity(self.total_bytes);
        for fragment in self.fragments {
            data.extend_from_slice(&fragment);
        }
        RecordedArtifact::new(mime_type, data, count)
    }
}
