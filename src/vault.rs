// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Custodial key vault: symmetric encryption of account private keys.
//!
//! Keys are encrypted with AES-256-GCM under a process-wide master key
//! before they reach the record store, and decrypted on demand for the
//! duration of a single signing operation. Plaintext key material lives
//! inside [`SigningKey`], which zeroizes on drop and has a redacted
//! `Debug` implementation.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::Zeroizing;

/// AES-GCM nonce length in bytes, prepended to every ciphertext blob.
const NONCE_LEN: usize = 12;

/// Errors from vault operations.
///
/// Messages never contain key material or ciphertext contents. A
/// decryption failure is fatal to the enclosing operation and must not
/// be retried.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("vault master key must be 32 bytes")]
    InvalidMasterKey,

    #[error("encrypted key blob is truncated")]
    TruncatedCiphertext,

    #[error("key decryption failed")]
    DecryptionFailed,

    #[error("key encryption failed")]
    EncryptionFailed,
}

/// Plaintext secp256k1 private key material.
///
/// Exists only inside the stack frame of a single operation; the buffer
/// is zeroized when dropped. Never logged, serialized or returned to
/// callers.
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// AES-256-GCM vault over custodial private keys.
#[derive(Clone)]
pub struct KeyVault {
    cipher: Aes256Gcm,
}

impl KeyVault {
    /// Build a vault from a 32-byte master key.
    pub fn new(master_key: &[u8]) -> Result<Self, VaultError> {
        let cipher =
            Aes256Gcm::new_from_slice(master_key).map_err(|_| VaultError::InvalidMasterKey)?;
        Ok(Self { cipher })
    }

    /// Encrypt plaintext key material for storage.
    ///
    /// Returns an opaque blob: a random 96-bit nonce followed by the
    /// ciphertext and authentication tag. Called exactly once per
    /// account, at creation time; the plaintext is dropped (and
    /// zeroized) by the caller immediately afterwards.
    pub fn encrypt(&self, key: &SigningKey) -> Result<Vec<u8>, VaultError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, key.as_bytes())
            .map_err(|_| VaultError::EncryptionFailed)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypt a stored blob back into signing key material.
    ///
    /// Deterministic and synchronous; no I/O. Any failure (truncated
    /// blob, authentication tag mismatch, wrong master key) is fatal.
    pub fn decrypt(&self, blob: &[u8]) -> Result<SigningKey, VaultError> {
        if blob.len() <= NONCE_LEN {
            return Err(VaultError::TruncatedCiphertext);
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| VaultError::DecryptionFailed)?;

        Ok(SigningKey(Zeroizing::new(plaintext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER_KEY: [u8; 32] = [7u8; 32];

    fn vault() -> KeyVault {
        KeyVault::new(&MASTER_KEY).unwrap()
    }

    #[test]
    fn round_trip_recovers_key_material() {
        let vault = vault();
        let key = SigningKey::from_bytes(vec![0xAB; 32]);

        let blob = vault.encrypt(&key).unwrap();
        let recovered = vault.decrypt(&blob).unwrap();

        assert_eq!(recovered.as_bytes(), key.as_bytes());
    }

    #[test]
    fn ciphertext_differs_from_plaintext_and_varies_per_call() {
        let vault = vault();
        let key = SigningKey::from_bytes(vec![0xAB; 32]);

        let blob_a = vault.encrypt(&key).unwrap();
        let blob_b = vault.encrypt(&key).unwrap();

        assert_ne!(&blob_a[NONCE_LEN..], key.as_bytes());
        // Random nonces: same plaintext never produces the same blob.
        assert_ne!(blob_a, blob_b);
    }

    #[test]
    fn tampered_blob_fails_closed() {
        let vault = vault();
        let key = SigningKey::from_bytes(vec![0xAB; 32]);

        let mut blob = vault.encrypt(&key).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;

        assert!(matches!(
            vault.decrypt(&blob),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn wrong_master_key_fails_closed() {
        let key = SigningKey::from_bytes(vec![0xAB; 32]);
        let blob = vault().encrypt(&key).unwrap();

        let other = KeyVault::new(&[9u8; 32]).unwrap();
        assert!(matches!(
            other.decrypt(&blob),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let vault = vault();
        assert!(matches!(
            vault.decrypt(&[0u8; NONCE_LEN]),
            Err(VaultError::TruncatedCiphertext)
        ));
    }

    #[test]
    fn wrong_sized_master_key_is_rejected() {
        assert!(matches!(
            KeyVault::new(&[1u8; 16]),
            Err(VaultError::InvalidMasterKey)
        ));
    }

    #[test]
    fn signing_key_debug_is_redacted() {
        let key = SigningKey::from_bytes(vec![0xAB; 32]);
        let rendered = format!("{key:?}");
        assert_eq!(rendered, "SigningKey(..)");
        assert!(!rendered.contains("171")); // 0xAB
    }
}
