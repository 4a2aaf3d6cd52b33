//! Validated resource identifier.
//!
//! The gate checks identifier syntax before touching the store, so malformed
//! input fails fast with `InvalidInput` instead of a wasted load. The accepted
//! alphabet covers hex ObjectIds as well as readable fixture ids.

use std::fmt;

use crate::error::GateError;

/// Maximum identifier length in bytes.
pub const MAX_ID_LEN: usize = 64;

/// A syntactically valid resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    /// Validate and wrap an identifier.
    ///
    /// Accepts 1..=64 bytes of ASCII alphanumerics plus `-` and `_`.
    pub fn parse(s: &str) -> Result<Self, GateError> {
        if s.is_empty() {
            return Err(GateError::InvalidInput("empty resource id".into()));
        }
        if s.len() > MAX_ID_LEN {
            return Err(GateError::InvalidInput(format!(
                "resource id too long: {} bytes (max {})",
                s.len(),
                MAX_ID_LEN
            )));
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(GateError::InvalidInput(format!(
                "resource id '{}' contains illegal characters",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ResourceId {
    type Error = GateError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = GateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl AsRef<str> for ResourceId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = ResourceId::parse("5f1e7a9b2c3d4e5f6a7b8c9d").unwrap();
        assert_eq!(id.as_str(), "5f1e7a9b2c3d4e5f6a7b8c9d");

        assert!(ResourceId::parse("u1").is_ok());
        assert!(ResourceId::parse("formation_42").is_ok());
        assert!(ResourceId::parse("a-b-c").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(ResourceId::parse("").is_err());
    }

    #[test]
    fn test_parse_illegal_characters() {
        assert!(ResourceId::parse("a b").is_err());
        assert!(ResourceId::parse("a/b").is_err());
        assert!(ResourceId::parse("a.b").is_err());
        assert!(ResourceId::parse("été").is_err());
    }

    #[test]
    fn test_parse_too_long() {
        let max = "a".repeat(MAX_ID_LEN);
        assert!(ResourceId::parse(&max).is_ok());

        let over = "a".repeat(MAX_ID_LEN + 1);
        assert!(ResourceId::parse(&over).is_err());
    }

    #[test]
    fn test_invalid_input_variant() {
        match ResourceId::parse("") {
            Err(GateError::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let id = ResourceId::parse("fo1").unwrap();
        assert_eq!(id.to_string(), "fo1");
    }
}
