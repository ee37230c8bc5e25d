//! Inbound command vocabulary.

use std::fmt;

/// The fixed set of commands a bridge client may issue. Anything outside
/// this vocabulary fails classification and the whole message is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetLogins,
    GetLoginsCount,
    GetAllLogins,
    SetLogin,
    Associate,
    TestAssociate,
    GeneratePassword,
}

impl Command {
    /// Classify a wire `RequestType` string. Matching is exact.
    pub fn parse(s: &str) -> Option<Command> {
        match s {
            "get-logins" => Some(Command::GetLogins),
            "get-logins-count" => Some(Command::GetLoginsCount),
            "get-all-logins" => Some(Command::GetAllLogins),
            "set-login" => Some(Command::SetLogin),
            "associate" => Some(Command::Associate),
            "test-associate" => Some(Command::TestAssociate),
            "generate-password" => Some(Command::GeneratePassword),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::GetLogins => "get-logins",
            Command::GetLoginsCount => "get-logins-count",
            Command::GetAllLogins => "get-all-logins",
            Command::SetLogin => "set-login",
            Command::Associate => "associate",
            Command::TestAssociate => "test-associate",
            Command::GeneratePassword => "generate-password",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_roundtrip() {
        for cmd in [
            Command::GetLogins,
            Command::GetLoginsCount,
            Command::GetAllLogins,
            Command::SetLogin,
            Command::Associate,
            Command::TestAssociate,
            Command::GeneratePassword,
        ] {
            assert_eq!(Command::parse(cmd.as_str()), Some(cmd));
        }
    }

    #[test]
    fn unknown_strings_fail_classification() {
        assert_eq!(Command::parse("delete-everything"), None);
        assert_eq!(Command::parse(""), None);
        // Exact match only.
        assert_eq!(Command::parse("GET-LOGINS"), None);
        assert_eq!(Command::parse("get-logins "), None);
    }
}
