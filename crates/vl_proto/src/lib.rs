//! vl_proto — Wire types and codec for the VaultLink browser bridge.
//!
//! The bridge lets a browser extension query and update credentials held by
//! the vault over a local, authenticated channel. The extension never sees
//! the master database key: each side proves possession of the negotiated
//! shared key per message (nonce/verifier handshake in `vl_crypto`), and
//! credential data travels field-encrypted inside plain JSON documents.
//!
//! # Modules
//! - `command`    — inbound command vocabulary
//! - `credential` — plain credential record placed into responses
//! - `request`    — inbound message parsing, classification, selective decryption
//! - `response`   — outbound message assembly and field encryption
//! - `policy`     — per-credential host authorization policy
//! - `error`      — unified error type

pub mod command;
pub mod credential;
pub mod error;
pub mod policy;
pub mod request;
pub mod response;

pub use command::Command;
pub use credential::{Credential, CustomField};
pub use error::ProtocolError;
pub use policy::{HostPolicy, PolicyAttributes, POLICY_ATTRIBUTE};
pub use request::Request;
pub use response::{Response, PROTOCOL_VERSION};
