use std::collections::HashMap;

/// Chunk encryption used when exporting artifacts.
///
/// Sealed chunk format:
/// ```text
/// [12-byte nonce] [ciphertext] [16-byte GCM authentication tag]
/// ```
pub trait CaptureEncryptor: Send + Sync {
    /// Seal one chunk of artifact data.
    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, String>;

    /// Open a chunk produced by `encrypt`.
    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, String>;

    /// Metadata about the key (e.g. `keyId`).
    fn key_metadata(&self) -> HashMap<String, String>;

    /// Algorithm identifier (e.g. "AES-256-GCM").
    fn algorithm(&self) -> &str;

    fn clone_box(&self) -> Box<dyn CaptureEncryptor>;
}

impl Clone for Box<dyn CaptureEncryptor> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
