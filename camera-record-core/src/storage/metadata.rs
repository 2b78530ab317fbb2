use std::fs;
use std::path::{Path, PathBuf};

use crate::models::artifact::ArtifactMetadata;
use crate::models::error::CaptureError;

/// Sidecar path for an exported artifact: `{artifact_path}.metadata.json`.
pub fn metadata_path(artifact_path: &Path) -> PathBuf {
    let mut name = artifact_path.as_os_str().to_owned();
    name.push(".metadata.json");
    PathBuf::from(name)
}

/// Write artifact metadata as a JSON sidecar file.
pub fn write_metadata(metadata: &ArtifactMetadata, artifact_path: &Path) -> Result<(), CaptureError> {
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CaptureError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(metadata_path(artifact_path), json)
        .map_err(|e| CaptureError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read artifact metadata from its JSON sidecar file.
pub fn read_metadata(artifact_path: &Path) -> Result<ArtifactMetadata, CaptureError> {
    let json = fs::read_to_string(metadata_path(artifact_path))
        .map_err(|e| CaptureError::StorageError(format!("failed to read metadata: {}", e)))?;
    let metadata: ArtifactMetadata = serde_json::from_str(&json)
        .map_err(|e| CaptureError::StorageError(format!("failed to parse metadata: {}", e)))?;
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::fragment_sequence::FragmentSequence;

    #[test]
    fn sidecar_path_appends_suffix() {
        let p = metadata_path(Path::new("/tmp/clip.webm"));
        assert_eq!(p, PathBuf::from("/tmp/clip.webm.metadata.json"));
    }

    #[test]
    fn metadata_survives_write_and_read() {
        let mut seq = FragmentSequence::new();
        seq.push(b"data".to_vec());
        let meta = seq.assemble("video/webm").metadata();

        let path = std::env::temp_dir().join(format!("camera_record_meta_{}.webm", std::process::id()));
        write_metadata(&meta, &path).unwrap();
        assert_eq!(read_metadata(&path).unwrap(), meta);

        fs::remove_file(metadata_path(&path)).ok();
    }
}
