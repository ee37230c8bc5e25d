//! AES-256-CBC field envelope and the nonce/verifier handshake.
//!
//! One envelope belongs to exactly one request or one response. Every text
//! field is encrypted independently: the CBC core is rebuilt from the
//! envelope's configured key/IV for each operation, never chained across
//! fields. Identical plaintexts under one envelope therefore produce
//! identical ciphertext; interoperating clients depend on this structural
//! property of the wire format.
//!
//! Padding is the legacy PKCS#7 variant: a plaintext already on a block
//! boundary gains a full extra block, and unpadding trusts the final byte
//! without checking the other padding bytes. Both behaviors are part of the
//! wire contract.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::CryptoError;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size in bytes; also the nonce/IV length on the wire.
pub const BLOCK_SIZE: usize = 16;

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;

/// A configured key + IV pair for one message's field encryption.
pub struct FieldCipher {
    key: Zeroizing<[u8; KEY_SIZE]>,
    iv: [u8; BLOCK_SIZE],
}

impl FieldCipher {
    /// Build an envelope from raw key and IV bytes. Lengths are validated
    /// here so the per-field operations below cannot fail.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; KEY_SIZE] = key
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
        let iv: [u8; BLOCK_SIZE] = iv
            .try_into()
            .map_err(|_| CryptoError::InvalidIvLength(iv.len()))?;
        Ok(Self {
            key: Zeroizing::new(key),
            iv,
        })
    }

    /// Build an envelope with a fresh random IV (responder side).
    pub fn with_random_iv(key: &[u8]) -> Result<Self, CryptoError> {
        let mut iv = [0u8; BLOCK_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut iv);
        Self::new(key, &iv)
    }

    pub fn iv(&self) -> &[u8; BLOCK_SIZE] {
        &self.iv
    }

    /// Encrypt one text field: UTF-8 bytes, PKCS#7 pad (full extra block when
    /// already aligned), CBC from the configured IV, base64.
    pub fn encrypt_field(&self, plaintext: &str) -> String {
        let mut buf = plaintext.as_bytes().to_vec();
        let pad = BLOCK_SIZE - buf.len() % BLOCK_SIZE;
        buf.resize(buf.len() + pad, pad as u8);

        // Fresh CBC state per field, same IV every time.
        let mut enc = Aes256CbcEnc::new((&*self.key).into(), (&self.iv).into());
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            enc.encrypt_block_mut(GenericArray::from_mut_slice(block));
        }
        general_purpose::STANDARD.encode(&buf)
    }

    /// Decrypt one text field. Corrupt input (bad base64, empty, not
    /// block-aligned) yields an empty string rather than an error; callers
    /// see a blank field, exactly as legacy peers expect.
    pub fn decrypt_field(&self, data: &str) -> String {
        let Ok(mut buf) = general_purpose::STANDARD.decode(data) else {
            return String::new();
        };
        if buf.is_empty() || buf.len() % BLOCK_SIZE != 0 {
            return String::new();
        }

        let mut dec = Aes256CbcDec::new((&*self.key).into(), (&self.iv).into());
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            dec.decrypt_block_mut(GenericArray::from_mut_slice(block));
        }

        // Legacy unpad: trust the final byte, discard that many bytes.
        if let Some(&pad) = buf.last() {
            buf.truncate(buf.len().saturating_sub(pad as usize));
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Responder half of the handshake: decode the shared key, draw a random IV,
/// publish it as the nonce, and prove key possession by encrypting that very
/// nonce. The returned envelope stays configured for the message's remaining
/// fields.
pub fn generate_verifier(key_b64: &str) -> Result<(FieldCipher, String, String), CryptoError> {
    let key = Zeroizing::new(general_purpose::STANDARD.decode(key_b64)?);
    let cipher = FieldCipher::with_random_iv(&key)?;
    let nonce = general_purpose::STANDARD.encode(cipher.iv());
    let verifier = cipher.encrypt_field(&nonce);
    Ok((cipher, nonce, verifier))
}

/// Verifier check: the IV is the base64-decoded nonce, and the check passes
/// iff the decrypted verifier equals the nonce string exactly. Every internal
/// failure (bad key length, bad base64) is deliberately indistinguishable
/// from a wrong key.
pub fn check_verifier(key_b64: &str, nonce_b64: &str, verifier_b64: &str) -> Option<FieldCipher> {
    let key = Zeroizing::new(general_purpose::STANDARD.decode(key_b64).ok()?);
    let iv = general_purpose::STANDARD.decode(nonce_b64).ok()?;
    let cipher = FieldCipher::new(&key, &iv).ok()?;
    if cipher.decrypt_field(verifier_b64) == nonce_b64 {
        Some(cipher)
    } else {
        None
    }
}
