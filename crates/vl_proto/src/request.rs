//! Inbound message parsing, classification, and selective decryption.

use serde::Deserialize;
use tracing::debug;

use vl_crypto::envelope;
use vl_crypto::FieldCipher;

use crate::command::Command;
use crate::error::ProtocolError;

/// Raw inbound document, strongly typed. Field presence is meaningful: an
/// absent field reads back as an empty string through the accessors, which
/// is what command handlers expect.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RequestMessage {
    request_type: Option<String>,
    nonce: Option<String>,
    verifier: Option<String>,
    id: Option<String>,
    key: Option<String>,
    sort_selection: Option<bool>,
    url: Option<String>,
    submit_url: Option<String>,
    realm: Option<String>,
    login: Option<String>,
    uuid: Option<String>,
    password: Option<String>,
}

/// One parsed inbound message plus its (at most one) decryption envelope.
///
/// The envelope only exists after a successful [`Request::check_verifier`];
/// until then the encrypted accessors must not be called.
pub struct Request {
    message: RequestMessage,
    command: Command,
    cipher: Option<FieldCipher>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("message", &self.message)
            .field("command", &self.command)
            .field("cipher", &self.cipher.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Request {
    /// Parse and classify an inbound message. Fails on invalid JSON and on
    /// an unknown or missing `RequestType`; the two cases are equally
    /// terminal for the message.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let message: RequestMessage = serde_json::from_str(text)?;
        let type_str = message.request_type.clone().unwrap_or_default();
        let command = Command::parse(&type_str).ok_or_else(|| {
            debug!(request_type = %type_str, "rejecting message with unrecognized type");
            ProtocolError::UnknownCommand(type_str)
        })?;
        Ok(Self {
            message,
            command,
            cipher: None,
        })
    }

    pub fn command(&self) -> Command {
        self.command
    }

    /// Cleartext sort flag; absent means false.
    pub fn sort_selection(&self) -> bool {
        self.message.sort_selection.unwrap_or(false)
    }

    /// Client/database identifier, cleartext.
    pub fn id(&self) -> &str {
        self.message.id.as_deref().unwrap_or_default()
    }

    /// Association key offered during the `associate` command, cleartext.
    pub fn key(&self) -> &str {
        self.message.key.as_deref().unwrap_or_default()
    }

    pub fn nonce(&self) -> &str {
        self.message.nonce.as_deref().unwrap_or_default()
    }

    pub fn verifier(&self) -> &str {
        self.message.verifier.as_deref().unwrap_or_default()
    }

    /// Prove the sender holds `key_b64` by decrypting the transmitted
    /// verifier under the transmitted nonce. On success the request's
    /// envelope is configured and the encrypted accessors become usable.
    ///
    /// Returns plain false on any failure: wrong key, absent fields, and
    /// malformed key material are deliberately indistinguishable.
    ///
    /// May be called at most once per request.
    pub fn check_verifier(&mut self, key_b64: &str) -> bool {
        assert!(
            self.cipher.is_none(),
            "check_verifier may run at most once per request"
        );
        match envelope::check_verifier(key_b64, self.nonce(), self.verifier()) {
            Some(cipher) => {
                self.cipher = Some(cipher);
                true
            }
            None => {
                debug!(command = %self.command, "verifier check failed");
                false
            }
        }
    }

    fn decrypt(&self, field: &Option<String>) -> String {
        let cipher = self
            .cipher
            .as_ref()
            .expect("verifier must be checked before reading encrypted fields");
        cipher.decrypt_field(field.as_deref().unwrap_or_default())
    }

    pub fn url(&self) -> String {
        self.decrypt(&self.message.url)
    }

    pub fn submit_url(&self) -> String {
        self.decrypt(&self.message.submit_url)
    }

    pub fn realm(&self) -> String {
        self.decrypt(&self.message.realm)
    }

    pub fn login(&self) -> String {
        self.decrypt(&self.message.login)
    }

    pub fn uuid(&self) -> String {
        self.decrypt(&self.message.uuid)
    }

    pub fn password(&self) -> String {
        self.decrypt(&self.message.password)
    }
}
