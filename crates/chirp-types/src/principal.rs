use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const ANONYMOUS: &str = "2vxsx-fae";

/// Textual identity of the caller of an entry point.
///
/// A `Principal` is recorded as the owner of every tweet and comment it
/// creates, and is what like tracking remembers. Two principals are the same
/// caller exactly when their text is equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Parse a principal from its textual form.
    ///
    /// The text must be non-empty and must not contain whitespace.
    pub fn new(text: impl Into<String>) -> Result<Self, TypeError> {
        let text = text.into();
        if text.is_empty() {
            return Err(TypeError::EmptyPrincipal);
        }
        if text.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidPrincipal(text));
        }
        Ok(Self(text))
    }

    /// The identity of an unauthenticated caller.
    pub fn anonymous() -> Self {
        Self(ANONYMOUS.to_string())
    }

    /// Derive a principal from a public key.
    ///
    /// The same key always produces the same principal.
    pub fn self_authenticating(public_key: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"chirp-principal-v1:");
        hasher.update(public_key);
        let hash = hasher.finalize();
        let hex = hex::encode(&hash.as_bytes()[..15]);
        // Grouped in fives, like other textual principal formats.
        let groups: Vec<&str> = hex
            .as_bytes()
            .chunks(5)
            .filter_map(|c| std::str::from_utf8(c).ok())
            .collect();
        Self(groups.join("-"))
    }

    /// [`Principal::self_authenticating`] for a hex-encoded public key.
    pub fn from_public_key_hex(key: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(key.trim()).map_err(|e| TypeError::InvalidKey(e.to_string()))?;
        if bytes.is_empty() {
            return Err(TypeError::InvalidKey("empty key".into()));
        }
        Ok(Self::self_authenticating(&bytes))
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.0)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Principal {
    type Error = TypeError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

impl std::str::FromStr for Principal {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
