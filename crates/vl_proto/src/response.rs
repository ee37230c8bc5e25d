//! Outbound message assembly and field encryption.

use serde::Serialize;
use serde_json::{Map, Value};

use vl_crypto::envelope::generate_verifier;
use vl_crypto::{CryptoError, FieldCipher};

use crate::credential::Credential;
use crate::error::ProtocolError;
use crate::request::Request;

/// Protocol version advertised in every response.
pub const PROTOCOL_VERSION: &str = "1.8.0.0";

/// Outbound document, strongly typed. Optional fields that were never set
/// are absent from the serialized JSON.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseMessage {
    version: String,
    hash: String,
    request_type: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<Vec<WireEntry>>,
}

/// One credential as it appears on the wire. The four fixed field names are
/// cleartext; custom fields hide their names too, so both key and value of
/// each pair are ciphertext.
#[derive(Debug, Serialize)]
struct WireEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Login")]
    login: String,
    #[serde(rename = "Password")]
    password: String,
    #[serde(rename = "Uuid")]
    uuid: String,
    #[serde(flatten)]
    custom: Map<String, Value>,
}

/// One outbound reply plus its (at most one) encryption envelope.
///
/// Construction echoes the request's command and defaults to failure;
/// [`Response::set_verifier`] must run before any credential data is added.
pub struct Response {
    message: ResponseMessage,
    cipher: Option<FieldCipher>,
}

impl Response {
    pub fn new(request: &Request, hash: &str) -> Self {
        Self {
            message: ResponseMessage {
                version: PROTOCOL_VERSION.to_string(),
                hash: hash.to_string(),
                request_type: request.command().as_str().to_string(),
                success: false,
                id: None,
                nonce: None,
                verifier: None,
                count: None,
                error: None,
                entries: None,
            },
            cipher: None,
        }
    }

    /// Establish this response's envelope: fresh random IV published as
    /// `Nonce`, proof of key possession published as `Verifier`. Must run
    /// exactly once, before any field encryption.
    pub fn set_verifier(&mut self, key_b64: &str) -> Result<(), CryptoError> {
        assert!(
            self.cipher.is_none(),
            "set_verifier may run at most once per response"
        );
        let (cipher, nonce, verifier) = generate_verifier(key_b64)?;
        self.message.nonce = Some(nonce);
        self.message.verifier = Some(verifier);
        self.cipher = Some(cipher);
        Ok(())
    }

    /// Encrypt the given credentials into the response and set `Count`.
    ///
    /// A `None` password is published as an unencrypted empty string, while
    /// `Some("")` is encrypted like any other value; interoperating clients
    /// rely on that distinction. Custom field pairs encrypt key and value.
    pub fn set_entries(&mut self, credentials: &[Credential]) {
        let cipher = self
            .cipher
            .as_ref()
            .expect("set_verifier must run before set_entries");

        let mut entries = Vec::with_capacity(credentials.len());
        for cred in credentials {
            let mut custom = Map::new();
            for field in cred.fields() {
                custom.insert(
                    cipher.encrypt_field(&field.key),
                    Value::String(cipher.encrypt_field(&field.value)),
                );
            }
            entries.push(WireEntry {
                name: cipher.encrypt_field(cred.name()),
                login: cipher.encrypt_field(cred.login()),
                password: match cred.password() {
                    Some(password) => cipher.encrypt_field(password),
                    None => String::new(),
                },
                uuid: cipher.encrypt_field(cred.uuid()),
                custom,
            });
        }
        self.message.count = Some(entries.len());
        self.message.entries = Some(entries);
    }

    pub fn set_id(&mut self, id: &str) {
        self.message.id = Some(id.to_string());
    }

    pub fn set_success(&mut self) {
        self.message.success = true;
    }

    /// Record an error message; failure and error text always go together.
    pub fn set_error(&mut self, error: &str) {
        self.message.success = false;
        self.message.error = Some(error.to_string());
    }

    pub fn set_count(&mut self, count: usize) {
        self.message.count = Some(count);
    }

    /// Emit the final wire document. The response is spent afterwards.
    pub fn serialize(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(&self.message)?)
    }
}
