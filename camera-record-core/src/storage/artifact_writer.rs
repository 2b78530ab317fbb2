use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::artifact::{sha256_hex, ArtifactMetadata, RecordedArtifact};
use crate::models::error::CaptureError;
use crate::traits::encryptor::CaptureEncryptor;

/// Plaintext bytes sealed per encrypted chunk.
pub const ENCRYPTED_CHUNK_SIZE: usize = 64 * 1024;

/// Result of exporting an artifact to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    pub file_path: PathBuf,
    pub bytes_written: u64,
    /// SHA-256 of the file as written (ciphertext when encrypted).
    pub file_checksum: String,
    pub metadata: ArtifactMetadata,
}

/// Writes an in-memory artifact to a file, optionally encrypting it.
///
/// ## File Format
///
/// **Plaintext (no encryptor):**
/// ```text
/// [artifact bytes...]
/// ```
///
/// **Encrypted (with encryptor):**
/// ```text
/// [Chunk 1: 4-byte LE length | sealed box (nonce + ciphertext + tag)]
/// [Chunk 2: ...]
/// ...
/// ```
pub struct ArtifactWriter {
    file_path: PathBuf,
    encryptor: Option<Box<dyn CaptureEncryptor>>,
}

impl ArtifactWriter {
    pub fn new(file_path: PathBuf, encryptor: Option<Box<dyn CaptureEncryptor>>) -> Self {
        Self { file_path, encryptor }
    }

    /// Write `artifact` and return the file checksum plus sidecar-ready metadata.
    pub fn write(&self, artifact: &RecordedArtifact) -> Result<ExportResult, CaptureError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;
        }

        let file = File::create(&self.file_path)
            .map_err(|e| CaptureError::StorageError(format!("failed to create file: {}", e)))?;
        let mut out = BufWriter::new(file);
        let mut bytes_written = 0u64;

        if let Some(ref encryptor) = self.encryptor {
            for chunk in artifact.data().chunks(ENCRYPTED_CHUNK_SIZE) {
                let sealed = encryptor
                    .encrypt(chunk)
                    .map_err(|e| CaptureError::EncryptionFailed(format!("chunk encryption failed: {}", e)))?;
                let chunk_length = (sealed.len() as u32).to_le_bytes();
                write_all(&mut out, &chunk_length)?;
                write_all(&mut out, &sealed)?;
                bytes_written += (chunk_length.len() + sealed.len()) as u64;
            }
        } else {
            write_all(&mut out, artifact.data())?;
            bytes_written = artifact.len() as u64;
        }

        out.flush()
            .map_err(|e| CaptureError::StorageError(format!("flush failed: {}", e)))?;
        drop(out);

        let file_checksum = sha256_file(&self.file_path)?;

        let mut metadata = artifact.metadata();
        metadata.file_path = Some(self.file_path.to_string_lossy().to_string());
        metadata.is_encrypted = self.encryptor.is_some();
        metadata.encryption_algorithm = self.encryptor.as_ref().map(|e| e.algorithm().to_string());
        metadata.encryption_key_id = self
            .encryptor
            .as_ref()
            .and_then(|e| e.key_metadata().get("keyId").cloned());

        log::info!(
            "Exported artifact {} ({} bytes, encrypted={}) to {}",
            artifact.id(),
            bytes_written,
            metadata.is_encrypted,
            self.file_path.display()
        );

        Ok(ExportResult {
            file_path: self.file_path.clone(),
            bytes_written,
            file_checksum,
            metadata,
        })
    }
}

/// Read back an exported artifact, decrypting when an encryptor is given.
pub fn read_artifact(
    path: &Path,
    encryptor: Option<&dyn CaptureEncryptor>,
) -> Result<Vec<u8>, CaptureError> {
    let raw = fs::read(path)
        .map_err(|e| CaptureError::StorageError(format!("failed to read artifact: {}", e)))?;

    let Some(encryptor) = encryptor else {
        return Ok(raw);
    };

    let mut plain = Vec::with_capacity(raw.len());
    let mut offset = 0usize;
    while offset < raw.len() {
        let header = raw
            .get(offset..offset + 4)
            .ok_or_else(|| CaptureError::StorageError("truncated chunk length".into()))?;
        let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        offset += 4;
        let sealed = raw
            .get(offset..offset + len)
            .ok_or_else(|| CaptureError::StorageError("truncated sealed chunk".into()))?;
        let chunk = encryptor
            .decrypt(sealed)
            .map_err(CaptureError::EncryptionFailed)?;
        plain.extend_from_slice(&chunk);
        offset += len;
    }
    Ok(plain)
}

fn write_all(out: &mut impl Write, data: &[u8]) -> Result<(), CaptureError> {
    out.write_all(data)
        .map_err(|e| CaptureError::StorageError(format!("write failed: {}", e)))
}

fn sha256_file(path: &Path) -> Result<String, CaptureError> {
    let data = fs::read(path)
        .map_err(|e| CaptureError::StorageError(format!("failed to read file for checksum: {}", e)))?;
    Ok(sha256_hex(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::fragment_sequence::FragmentSequence;
    use crate::storage::aes_encryptor::AesGcmEncryptor;

    fn temp_file_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("camera_record_test_{}_{}", std::process::id(), name))
    }

    fn artifact_of(parts: &[&[u8]]) -> RecordedArtifact {
        let mut seq = FragmentSequence::new();
        for part in parts {
            seq.push(part.to_vec());
        }
        seq.assemble("video/webm")
    }

    #[test]
    fn write_plain_artifact() {
        let path = temp_file_path("plain.webm");
        let artifact = artifact_of(&[b"AAAA", b"BB"]);

        let result = ArtifactWriter::new(path.clone(), None).write(&artifact).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"AAAABB");
        assert_eq!(result.bytes_written, 6);
        assert_eq!(result.file_checksum, artifact.checksum());
        assert!(!result.metadata.is_encrypted);
        assert_eq!(result.metadata.file_path.as_deref(), Some(&*path.to_string_lossy()));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn write_encrypted_artifact_round_trips() {
        let path = temp_file_path("encrypted.webm.enc");
        let payload = vec![0x42u8; ENCRYPTED_CHUNK_SIZE + 10];
        let artifact = artifact_of(&[&payload]);
        let encryptor = AesGcmEncryptor::new([9u8; 32], "test-key");

        let result = ArtifactWriter::new(path.clone(), Some(Box::new(encryptor.clone())))
            .write(&artifact)
            .unwrap();

        // Two chunks: full + 10-byte tail, each with 4-byte prefix and 28 bytes of nonce/tag.
        let expected = (4 + 12 + ENCRYPTED_CHUNK_SIZE + 16) + (4 + 12 + 10 + 16);
        assert_eq!(result.bytes_written, expected as u64);
        assert!(result.metadata.is_encrypted);
        assert_eq!(result.metadata.encryption_algorithm.as_deref(), Some("AES-256-GCM"));
        assert_eq!(result.metadata.encryption_key_id.as_deref(), Some("test-key"));
        assert_ne!(result.file_checksum, artifact.checksum());

        let plain = read_artifact(&path, Some(&encryptor as &dyn CaptureEncryptor)).unwrap();
        assert_eq!(plain, payload);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_artifact_writes_empty_file() {
        let path = temp_file_path("empty.webm");
        let artifact = FragmentSequence::new().assemble("video/webm");

        let result = ArtifactWriter::new(path.clone(), None).write(&artifact).unwrap();
        assert_eq!(result.bytes_written, 0);
        assert!(fs::read(&path).unwrap().is_empty());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn truncated_encrypted_file_is_storage_error() {
        let path = temp_file_path("truncated.enc");
        fs::write(&path, [10u8, 0, 0, 0, 1, 2]).unwrap();
        let encryptor = AesGcmEncryptor::new([0u8; 32], "k");

        let err = read_artifact(&path, Some(&encryptor as &dyn CaptureEncryptor)).unwrap_err();
        assert!(matches!(err, CaptureError::StorageError(_)));

        fs::remove_file(&path).ok();
    }
}
