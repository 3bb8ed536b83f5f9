//! Authenticated decryption of the global configuration
//!
//! The global config is stored as a NaCl secretbox: a 24 byte nonce followed
//! by the XSalsa20-Poly1305 box. Deployment tooling encrypts it out of band;
//! this side only ever decrypts, with a key supplied per request.

use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::{Key, Nonce, XSalsa20Poly1305};
use thiserror::Error;

/// Required key length in bytes.
pub const KEY_SIZE: usize = 32;

/// Nonce prefix length of the stored ciphertext.
const NONCE_SIZE: usize = 24;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecryptError {
    /// Wrong key, truncated input or tampered ciphertext. Fails closed -
    /// no plaintext is ever produced on this path.
    #[error("ciphertext authentication failed")]
    Authentication,
    #[error("key must be 32 bytes, got {0}")]
    InvalidKeyLength(usize),
}

/// Decrypt a nonce-prefixed secretbox ciphertext with the given 32 byte key.
pub fn decrypt(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, DecryptError> {
    if key.len() != KEY_SIZE {
        return Err(DecryptError::InvalidKeyLength(key.len()));
    }
    if ciphertext.len() < NONCE_SIZE {
        return Err(DecryptError::Authentication);
    }

    let (nonce, boxed) = ciphertext.split_at(NONCE_SIZE);
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), boxed)
        .map_err(|_| DecryptError::Authentication)
}

#[cfg(test)]
pub(crate) fn seal(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Vec<u8> {
    let nonce = [0x24u8; NONCE_SIZE];
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key));
    let boxed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .expect("secretbox encryption");
    let mut out = nonce.to_vec();
    out.extend_from_slice(&boxed);
    out
}
