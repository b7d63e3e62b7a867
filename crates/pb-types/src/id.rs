use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix carried by every identifier synthesized for a remote feed post.
///
/// Store backends never mint keys with this prefix, so remote identifiers
/// cannot collide with local ones inside a merged listing.
pub const REMOTE_KEY_PREFIX: &str = "remote-";

/// Identifier of a post.
///
/// Relational and in-memory stores assign small integer surrogate keys; the
/// document store assigns opaque string keys. Serialized untagged, so a
/// numeric id is a JSON number and a key is a JSON string.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Numeric(i64),
    Key(String),
}

impl PostId {
    /// Synthesize the identifier of a remote feed post.
    pub fn remote(upstream_id: i64) -> Self {
        Self::Key(format!("{REMOTE_KEY_PREFIX}{upstream_id}"))
    }

    /// Returns `true` if this identifier was synthesized for a remote post.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Key(key) if key.starts_with(REMOTE_KEY_PREFIX))
    }

    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Key(_) => None,
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Numeric(_) => None,
            Self::Key(key) => Some(key),
        }
    }
}

impl From<i64> for PostId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl fmt::Debug for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostId({self})")
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Key(key) => write!(f, "{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_ids_are_prefixed() {
        let id = PostId::remote(7);
        assert_eq!(id.to_string(), "remote-7");
        assert!(id.is_remote());
        assert!(!PostId::Numeric(7).is_remote());
        assert!(!PostId::from("0190c2a4-local").is_remote());
    }

    #[test]
    fn remote_never_equals_local_numeric() {
        assert_ne!(PostId::remote(1), PostId::Numeric(1));
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(serde_json::to_string(&PostId::Numeric(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&PostId::from("abc")).unwrap(), "\"abc\"");

        let n: PostId = serde_json::from_str("5").unwrap();
        assert_eq!(n, PostId::Numeric(5));
        let k: PostId = serde_json::from_str("\"remote-5\"").unwrap();
        assert_eq!(k, PostId::remote(5));
    }

    #[test]
    fn accessors() {
        assert_eq!(PostId::Numeric(3).as_numeric(), Some(3));
        assert_eq!(PostId::Numeric(3).as_key(), None);
        assert_eq!(PostId::from("k").as_key(), Some("k"));
        assert_eq!(PostId::from("k").as_numeric(), None);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", PostId::Numeric(9)), "PostId(9)");
    }
}
