//! User Name Value Object
//!
//! Display name of a user. Not an identifier: duplicates are allowed and
//! any script is accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Please tell us your name")]
    Empty,

    #[error("Name must be at most {} characters", USER_NAME_MAX_LENGTH)]
    TooLong,

    #[error("Name contains invalid characters")]
    InvalidCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Trims surrounding whitespace before validating.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameError> {
        let name = raw.as_ref().trim();

        if name.is_empty() {
            return Err(UserNameError::Empty);
        }
        if name.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong);
        }
        if name.chars().any(char::is_control) {
            return Err(UserNameError::InvalidCharacter);
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_valid() {
        assert_eq!(UserName::new("  Jonas Schmedtmann ").unwrap().as_str(), "Jonas Schmedtmann");
        assert!(UserName::new("山田 太郎").is_ok());
        assert!(UserName::new("a".repeat(USER_NAME_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_user_name_invalid() {
        assert_eq!(UserName::new("").unwrap_err(), UserNameError::Empty);
        assert_eq!(UserName::new(" \t ").unwrap_err(), UserNameError::Empty);
        assert_eq!(
            UserName::new("a".repeat(USER_NAME_MAX_LENGTH + 1)).unwrap_err(),
            UserNameError::TooLong
        );
        assert_eq!(UserName::new("bad\u{0007}name").unwrap_err(), UserNameError::InvalidCharacter);
    }
}
