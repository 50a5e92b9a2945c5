mod note;

pub use note::{Note, NoteDraft, NoteUpdate};

use serde::{Deserialize, Serialize};

/// Identity of a registered user (their username)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whoever is making the current request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Requester {
    #[default]
    Anonymous,
    User(UserId),
}

impl Requester {
    pub fn user(name: impl Into<String>) -> Self {
        Requester::User(UserId::new(name))
    }

    /// Build from an optional username; blank names count as anonymous.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(n) if !n.is_empty() => Requester::user(n),
            _ => Requester::Anonymous,
        }
    }

    pub fn as_user(&self) -> Option<&UserId> {
        match self {
            Requester::User(id) => Some(id),
            Requester::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Requester::Anonymous)
    }
}

impl std::fmt::Display for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requester::Anonymous => write!(f, "anonymous"),
            Requester::User(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requester_from_name() {
        assert_eq!(Requester::from_name(None), Requester::Anonymous);
        assert_eq!(Requester::from_name(Some("  ")), Requester::Anonymous);
        assert_eq!(
            Requester::from_name(Some("Лев Толстой")),
            Requester::user("Лев Толстой")
        );
    }

    #[test]
    fn test_user_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&UserId::new("reader")).unwrap();
        assert_eq!(json, "\"reader\"");
    }
}
