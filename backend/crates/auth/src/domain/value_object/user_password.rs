//! User Password Value Object
//!
//! Domain wrappers over `platform::password`:
//! - [`RawPassword`] is clear text from a request, zeroized on drop
//! - [`UserPassword`] is the Argon2id PHC string that gets stored
//!
//! Hashing and verification block for tens of milliseconds. From a request
//! task, go through the async functions in `domain::service::credential`,
//! which run them on the blocking pool.

use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

use crate::error::AuthResult;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A new password. Must satisfy the complexity policy.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    /// A login candidate or confirmation value; no policy check.
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::candidate(raw))
    }

    /// Constant-time equality.
    pub fn matches(&self, other: &RawPassword) -> bool {
        self.0.matches(&other.0)
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        Ok(Self(raw.0.hash(pepper)?))
    }

    /// Fails on a malformed stored hash.
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        Ok(Self(HashedPassword::from_phc_string(phc_string)?))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `Ok(false)` on mismatch; `Err` only when the hash itself is unusable.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<bool> {
        Ok(self.0.verify(&raw.0, pepper)?)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;

    #[test]
    fn test_raw_password_policy() {
        assert!(RawPassword::new("Valid1Pass!".to_string()).is_ok());
        assert_eq!(
            RawPassword::new("NoSymbol123".to_string()).unwrap_err(),
            PasswordPolicyError::MissingSymbol
        );
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("Valid1Pass!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw, None).unwrap();

        assert!(hashed.verify(&raw, None).unwrap());
        assert!(!hashed
            .verify(&RawPassword::candidate("Valid1Pass?".to_string()), None)
            .unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        assert!(matches!(
            UserPassword::from_phc_string("$2a$12$not-an-argon-hash"),
            Err(AuthError::PasswordHash(_))
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("Secret1Pass!".to_string()).unwrap();
        assert!(!format!("{:?}", raw).contains("Secret"));

        let hashed = UserPassword::from_raw(&raw, None).unwrap();
        assert!(format!("{:?}", hashed).contains("[HASH]"));
    }
}
