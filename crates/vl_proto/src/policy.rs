//! Per-credential host authorization policy.
//!
//! Each credential can carry an allow-list and a deny-list of web origins
//! plus an optional HTTP authentication realm, persisted as one JSON text
//! attribute on the credential itself. A command handler consults the policy
//! to decide whether a given origin may receive the credential.
//!
//! The credential store stays external: this module only reads and writes
//! the named attribute through [`PolicyAttributes`], and the caller persists
//! the mutated credential afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProtocolError;

/// Name of the text attribute holding the policy blob.
pub const POLICY_ATTRIBUTE: &str = "VaultLink Settings";

/// Access to a credential's named text attributes, implemented by the
/// storage engine's entry type.
pub trait PolicyAttributes {
    fn attribute(&self, key: &str) -> Option<String>;
    fn set_attribute(&mut self, key: &str, value: String);
}

/// Persisted shape of the policy attribute.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct PolicyBlob {
    allow: Vec<String>,
    deny: Vec<String>,
    realm: String,
}

/// Allow/deny membership and realm for one credential.
///
/// Invariant: a host is never in both sets; `allow` and `deny` enforce the
/// exclusion at the mutation site.
#[derive(Debug, Clone, Default)]
pub struct HostPolicy {
    allowed: HashSet<String>,
    denied: HashSet<String>,
    realm: String,
}

impl HostPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the policy from the credential's attribute.
    ///
    /// Absent or empty attribute means "no policy configured": returns
    /// `Ok(false)` without touching in-memory state. A present but
    /// unparseable attribute is an error, also leaving state untouched.
    /// Otherwise the allow set, deny set, and realm are each fully replaced.
    pub fn load(&mut self, entry: &impl PolicyAttributes) -> Result<bool, ProtocolError> {
        let Some(raw) = entry.attribute(POLICY_ATTRIBUTE) else {
            return Ok(false);
        };
        if raw.is_empty() {
            return Ok(false);
        }
        let blob: PolicyBlob = serde_json::from_str(&raw).map_err(|e| {
            warn!(error = %e, "corrupt host policy attribute");
            ProtocolError::CorruptPolicy(e)
        })?;
        self.allowed = blob.allow.into_iter().collect();
        self.denied = blob.deny.into_iter().collect();
        self.realm = blob.realm;
        Ok(true)
    }

    /// Write the policy back into the credential's attribute, overwriting
    /// whatever was there. The caller persists the credential itself.
    pub fn save(&self, entry: &mut impl PolicyAttributes) -> Result<(), ProtocolError> {
        // Sorted for stable attribute content.
        let mut allow: Vec<String> = self.allowed.iter().cloned().collect();
        allow.sort();
        let mut deny: Vec<String> = self.denied.iter().cloned().collect();
        deny.sort();
        let blob = PolicyBlob {
            allow,
            deny,
            realm: self.realm.clone(),
        };
        entry.set_attribute(POLICY_ATTRIBUTE, serde_json::to_string(&blob)?);
        Ok(())
    }

    pub fn allow(&mut self, host: &str) {
        self.allowed.insert(host.to_string());
        self.denied.remove(host);
    }

    pub fn deny(&mut self, host: &str) {
        self.denied.insert(host.to_string());
        self.allowed.remove(host);
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        self.allowed.contains(host)
    }

    pub fn is_denied(&self, host: &str) -> bool {
        self.denied.contains(host)
    }

    pub fn allowed_hosts(&self) -> &HashSet<String> {
        &self.allowed
    }

    pub fn denied_hosts(&self) -> &HashSet<String> {
        &self.denied
    }

    /// Empty means no realm configured.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn set_realm(&mut self, realm: impl Into<String>) {
        self.realm = realm.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Stand-in for a stored credential's attribute map.
    #[derive(Default)]
    struct FakeEntry {
        attributes: HashMap<String, String>,
    }

    impl PolicyAttributes for FakeEntry {
        fn attribute(&self, key: &str) -> Option<String> {
            self.attributes.get(key).cloned()
        }

        fn set_attribute(&mut self, key: &str, value: String) {
            self.attributes.insert(key.to_string(), value);
        }
    }

    #[test]
    fn allow_and_deny_are_mutually_exclusive() {
        let mut policy = HostPolicy::new();
        policy.allow("example.com");
        assert!(policy.is_allowed("example.com"));
        assert!(!policy.is_denied("example.com"));

        policy.deny("example.com");
        assert!(policy.is_denied("example.com"));
        assert!(!policy.is_allowed("example.com"));

        policy.allow("example.com");
        assert!(policy.is_allowed("example.com"));
        assert!(!policy.is_denied("example.com"));
    }

    #[test]
    fn save_load_roundtrip() {
        let mut policy = HostPolicy::new();
        policy.allow("a.example.com");
        policy.allow("b.example.com");
        policy.deny("evil.example.com");
        policy.set_realm("Intranet");

        let mut entry = FakeEntry::default();
        policy.save(&mut entry).unwrap();

        let mut loaded = HostPolicy::new();
        assert!(loaded.load(&entry).unwrap());
        assert_eq!(loaded.allowed_hosts(), policy.allowed_hosts());
        assert_eq!(loaded.denied_hosts(), policy.denied_hosts());
        assert_eq!(loaded.realm(), "Intranet");
    }

    #[test]
    fn empty_realm_roundtrips() {
        let policy = HostPolicy::new();
        let mut entry = FakeEntry::default();
        policy.save(&mut entry).unwrap();
        let mut loaded = HostPolicy::new();
        assert!(loaded.load(&entry).unwrap());
        assert_eq!(loaded.realm(), "");
    }

    #[test]
    fn absent_attribute_means_no_policy() {
        let entry = FakeEntry::default();
        let mut policy = HostPolicy::new();
        policy.allow("keep.example.com");
        assert!(!policy.load(&entry).unwrap());
        // Prior in-memory state untouched.
        assert!(policy.is_allowed("keep.example.com"));
    }

    #[test]
    fn empty_attribute_means_no_policy() {
        let mut entry = FakeEntry::default();
        entry.set_attribute(POLICY_ATTRIBUTE, String::new());
        let mut policy = HostPolicy::new();
        assert!(!policy.load(&entry).unwrap());
    }

    #[test]
    fn corrupt_attribute_is_an_error_and_preserves_state() {
        let mut entry = FakeEntry::default();
        entry.set_attribute(POLICY_ATTRIBUTE, "{not json".to_string());
        let mut policy = HostPolicy::new();
        policy.deny("evil.example.com");
        let err = policy.load(&entry).unwrap_err();
        assert!(matches!(err, ProtocolError::CorruptPolicy(_)));
        assert!(policy.is_denied("evil.example.com"));
    }

    #[test]
    fn load_replaces_rather_than_merges() {
        let mut entry = FakeEntry::default();
        entry.set_attribute(
            POLICY_ATTRIBUTE,
            r#"{"Allow": ["new.example.com"], "Deny": [], "Realm": ""}"#.to_string(),
        );
        let mut policy = HostPolicy::new();
        policy.allow("old.example.com");
        policy.deny("gone.example.com");
        assert!(policy.load(&entry).unwrap());
        assert!(policy.is_allowed("new.example.com"));
        assert!(!policy.is_allowed("old.example.com"));
        assert!(!policy.is_denied("gone.example.com"));
    }

    #[test]
    fn missing_blob_keys_default_empty() {
        let mut entry = FakeEntry::default();
        entry.set_attribute(POLICY_ATTRIBUTE, "{}".to_string());
        let mut policy = HostPolicy::new();
        assert!(policy.load(&entry).unwrap());
        assert!(policy.allowed_hosts().is_empty());
        assert!(policy.denied_hosts().is_empty());
        assert_eq!(policy.realm(), "");
    }
}
