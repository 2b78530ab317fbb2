use std::collections::HashMap;

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};

use crate::traits::encryptor::CaptureEncryptor;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// AES-256-GCM encryptor with a caller-supplied key.
///
/// Output format: `nonce (12B) || ciphertext || tag (16B)`.
#[derive(Clone)]
pub struct AesGcmEncryptor {
    key: [u8; 32],
    key_id: String,
}

impl AesGcmEncryptor {
    pub fn new(key: [u8; 32], key_id: impl Into<String>) -> Self {
        Self {
            key,
            key_id: key_id.into(),
        }
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }
}

impl CaptureEncryptor for AesGcmEncryptor {
    fn encrypt(&self, data: &[u8]) -> Result<Vec<u8>, String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        // aes-gcm appends the tag to the ciphertext; only the nonce is prepended.
        let ciphertext = self
            .cipher()
            .encrypt(&nonce, data)
            .map_err(|e| format!("AES-GCM encryption failed: {}", e))?;

        let mut combined = Vec::with_capacity(nonce.len() + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        Ok(combined)
    }

    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, String> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(format!("sealed chunk too short: {} bytes", sealed.len()));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher()
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| format!("AES-GCM decryption failed: {}", e))
    }

    fn key_metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            ("keyId".to_string(), self.key_id.clone()),
            ("algorithm".to_string(), self.algorithm().to_string()),
        ])
    }

    fn algorithm(&self) -> &str {
        "AES-256-GCM"
    }

    fn clone_box(&self) -> Box<dyn CaptureEncryptor> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_chunk_layout() {
        let enc = AesGcmEncryptor::new([7u8; 32], "k1");
        let sealed = enc.encrypt(b"frame").unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + 5 + TAG_LEN);
        assert_eq!(enc.decrypt(&sealed).unwrap(), b"frame");
    }

    #[test]
    fn wrong_key_fails_to_open() {
        let sealed = AesGcmEncryptor::new([1u8; 32], "a").encrypt(b"frame").unwrap();
        assert!(AesGcmEncryptor::new([2u8; 32], "b").decrypt(&sealed).is_err());
        assert!(AesGcmEncryptor::new([1u8; 32], "a").decrypt(&[0u8; 4]).is_err());
    }

    #[test]
    fn key_metadata_has_key_id() {
        let enc = AesGcmEncryptor::new([0u8; 32], "demo-key-v1");
        assert_eq!(enc.key_metadata().get("keyId").map(String::as_str), Some("demo-key-v1"));
    }
}
