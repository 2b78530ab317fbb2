use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The finalized, playable recording assembled from every fragment of a
/// session. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedArtifact {
    id: String,
    mime_type: String,
    data: Vec<u8>,
    fragment_count: usize,
    created_at: String,
    checksum: String,
}

impl RecordedArtifact {
    pub(crate) fn new(mime_type: &str, data: Vec<u8>, fragment_count: usize) -> Self {
        let checksum = sha256_hex(&data);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mime_type: mime_type.to_string(),
            data,
            fragment_count,
            created_at: chrono::Utc::now().to_rfc3339(),
            checksum,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of fragments concatenated into this artifact.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// RFC 3339 creation timestamp.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// SHA-256 hex digest of the artifact content.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn metadata(&self) -> ArtifactMetadata {
        ArtifactMetadata {
            id: self.id.clone(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.data.len() as u64,
            fragment_count: self.fragment_count,
            checksum: self.checksum.clone(),
            created_at: self.created_at.clone(),
            file_path: None,
            is_encrypted: false,
            encryption_algorithm: None,
            encryption_key_id: None,
        }
    }
}

/// Metadata describing an artifact, stored as a JSON sidecar on export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub fragment_count: usize,
    /// Checksum of the plaintext artifact content.
    pub checksum: String,
    pub created_at: String,
    pub file_path: Option<String>,
    pub is_encrypted: bool,
    pub encryption_algorithm: Option<String>,
    pub encryption_key_id: Option<String>,
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
