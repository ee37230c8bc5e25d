//! Plain in-memory credential record.
//!
//! Built transiently by a command handler from whatever the storage engine
//! returned, handed to a `Response`, and dropped once the response is
//! serialized. Never persisted from here.

/// One additional named string field on a credential. Keys are not required
/// to be unique; insertion order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomField {
    pub key: String,
    pub value: String,
}

/// One stored credential as carried inside a response.
///
/// `password` distinguishes "no password stored" (`None`) from an empty
/// password (`Some("")`); the wire format treats the two differently.
#[derive(Debug, Clone, Default)]
pub struct Credential {
    name: String,
    login: String,
    password: Option<String>,
    uuid: String,
    fields: Vec<CustomField>,
}

impl Credential {
    pub fn new(
        name: impl Into<String>,
        login: impl Into<String>,
        password: Option<String>,
        uuid: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            login: login.into(),
            password,
            uuid: uuid.into(),
            fields: Vec::new(),
        }
    }

    /// Append a custom field, keeping insertion order.
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(CustomField {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn fields(&self) -> &[CustomField] {
        &self.fields
    }
}
