//! Room codes - short shareable identifiers
//!
//! A room code is 6 ASCII alphanumeric characters, stored uppercase.
//! User input is canonicalized (trimmed, uppercased) before lookup so
//! " abc123 " and "ABC123" resolve to the same room.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of every room code
pub const CODE_LEN: usize = 6;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Canonicalized room code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parse and canonicalize a user-entered code
    pub fn parse(input: &str) -> Result<Self> {
        let canonical = input.trim().to_ascii_uppercase();

        if canonical.is_empty() {
            return Err(Error::InvalidRoomCode("empty code".into()));
        }
        if canonical.len() != CODE_LEN {
            return Err(Error::InvalidRoomCode(format!(
                "expected {} characters, got {}",
                CODE_LEN,
                canonical.len()
            )));
        }
        if !canonical.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(Error::InvalidRoomCode(format!(
                "non-alphanumeric character in '{}'",
                canonical
            )));
        }

        Ok(Self(canonical))
    }

    /// Generate a random code (host-side convenience; uniqueness is
    /// enforced by the backend)
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code: String = (0..CODE_LEN)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        RoomCode::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalization() {
        let a = RoomCode::parse(" abc123 ").unwrap();
        let b = RoomCode::parse("ABC123").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "ABC123");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(RoomCode::parse("").is_err());
        assert!(RoomCode::parse("   ").is_err());
        assert!(RoomCode::parse("ABC12").is_err());
        assert!(RoomCode::parse("ABC1234").is_err());
        assert!(RoomCode::parse("ABC-12").is_err());
    }

    #[test]
    fn test_generate_is_valid() {
        for _ in 0..100 {
            let code = RoomCode::generate();
            assert!(RoomCode::parse(code.as_str()).is_ok());
        }
    }
}
