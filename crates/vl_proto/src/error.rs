use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unrecognized request type: {0:?}")]
    UnknownCommand(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] vl_crypto::CryptoError),

    #[error("corrupt host policy attribute: {0}")]
    CorruptPolicy(#[source] serde_json::Error),
}
