//! vl_crypto — VaultLink Browser Bridge cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto; the block cipher comes from audited RustCrypto crates.
//! - Zeroize key material on drop.
//! - Wire compatibility over modern taste: the field envelope reproduces the
//!   legacy bridge format exactly, quirks included (see `envelope`).
//!
//! # Module layout
//! - `envelope` — AES-256-CBC field cipher + nonce/verifier handshake
//! - `error`    — unified error type

pub mod envelope;
pub mod error;

pub use envelope::{FieldCipher, BLOCK_SIZE, KEY_SIZE};
pub use error::CryptoError;
