//! AES-256-GCM sealing for the session cookie value.
//!
//! Wire format: base64url(nonce || ciphertext), 12-byte nonce.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL;
use base64::Engine;
use thiserror::Error;

const NONCE_LEN: usize = 12;

/// Failure to open a sealed value. Callers treat every variant identically
/// to "no session"; the browser never sees these.
#[derive(Error, Debug)]
pub enum SealedError {
    #[error("sealed value is malformed")]
    Malformed,
    #[error("sealed value failed to decrypt")]
    Crypto,
}

pub struct SealedCodec {
    key: [u8; 32],
}

impl SealedCodec {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<String, SealedError> {
        let cipher = Aes256Gcm::new_from_slice(&self.key).map_err(|_| SealedError::Crypto)?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| SealedError::Crypto)?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);

        Ok(BASE64URL.encode(raw))
    }

    pub fn open(&self, value: &str) -> Result<Vec<u8>, SealedError> {
        let raw = BASE64URL.decode(value).map_err(|_| SealedError::Malformed)?;
        if raw.len() < NONCE_LEN {
            return Err(SealedError::Malformed);
        }

        let cipher = Aes256Gcm::new_from_slice(&self.key).map_err(|_| SealedError::Crypto)?;
        let nonce = Nonce::from_slice(&raw[..NONCE_LEN]);

        cipher
            .decrypt(nonce, &raw[NONCE_LEN..])
            .map_err(|_| SealedError::Crypto)
    }
}
