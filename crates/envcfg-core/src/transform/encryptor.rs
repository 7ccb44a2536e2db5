//! Value encryption used by the `encrypted` directive.
//!
//! # Format
//! `0:3:<hex(nonce || ciphertext)>`
//!
//! - The nonce is the first 16 bytes of a keyed BLAKE3 hash of the plaintext,
//!   so encrypting the same value twice yields the same text and re-imports
//!   leave the store unchanged. It doubles as the integrity check on decrypt.
//! - The ciphertext is the plaintext XORed with the keyed BLAKE3 XOF stream
//!   seeded by the nonce.

use anyhow::Context;

const FORMAT_PREFIX: &str = "0:3:";
const NONCE_LEN: usize = 16;
const CIPHER_CONTEXT: &str = "envcfg 2024-01-01 value cipher key";
const NONCE_CONTEXT: &str = "envcfg 2024-01-01 value nonce key";

/// Host-provided reversible encryption.
pub trait Encryptor: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> anyhow::Result<String>;
}

/// BLAKE3-based encryptor keyed from a passphrase.
#[derive(Clone)]
pub struct KeyedEncryptor {
    cipher_key: [u8; 32],
    nonce_key: [u8; 32],
}

impl std::fmt::Debug for KeyedEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedEncryptor").finish_non_exhaustive()
    }
}

impl KeyedEncryptor {
    pub fn from_passphrase(passphrase: &str) -> Self {
        Self {
            cipher_key: blake3::derive_key(CIPHER_CONTEXT, passphrase.as_bytes()),
            nonce_key: blake3::derive_key(NONCE_CONTEXT, passphrase.as_bytes()),
        }
    }

    fn nonce_for(&self, plaintext: &[u8]) -> [u8; NONCE_LEN] {
        let hash = blake3::keyed_hash(&self.nonce_key, plaintext);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&hash.as_bytes()[..NONCE_LEN]);
        nonce
    }

    fn apply_keystream(&self, nonce: &[u8], data: &mut [u8]) {
        let mut stream = vec![0u8; data.len()];
        blake3::Hasher::new_keyed(&self.cipher_key)
            .update(nonce)
            .finalize_xof()
            .fill(&mut stream);
        for (byte, key) in data.iter_mut().zip(stream) {
            *byte ^= key;
        }
    }

    pub fn decrypt(&self, encoded: &str) -> anyhow::Result<String> {
        let hex_part = encoded
            .strip_prefix(FORMAT_PREFIX)
            .ok_or_else(|| anyhow::anyhow!("Unsupported encrypted value format"))?;
        let bytes = hex::decode(hex_part).context("Encrypted value is not valid hex")?;
        if bytes.len() < NONCE_LEN {
            anyhow::bail!("Encrypted value is truncated");
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let mut plaintext = ciphertext.to_vec();
        self.apply_keystream(nonce, &mut plaintext);

        if self.nonce_for(&plaintext) != nonce {
            anyhow::bail!("Encrypted value does not match this key");
        }
        String::from_utf8(plaintext).context("Decrypted value is not UTF-8")
    }
}

impl Encryptor for KeyedEncryptor {
    fn encrypt(&self, plaintext: &str) -> anyhow::Result<String> {
        let nonce = self.nonce_for(plaintext.as_bytes());
        let mut data = plaintext.as_bytes().to_vec();
        self.apply_keystream(&nonce, &mut data);

        let mut out = Vec::with_capacity(NONCE_LEN + data.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&data);
        Ok(format!("{FORMAT_PREFIX}{}", hex::encode(out)))
    }
}
