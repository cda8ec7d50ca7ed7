//! Password Policy, Hashing and Verification
//!
//! - Complexity policy: 8 to 16 characters drawn from letters, digits and
//!   the symbols `!@#$%^&*`, with at least one of each class
//! - Argon2id hashing with a per-password random salt (PHC string output)
//! - Zeroization of clear text on drop
//! - Constant-time comparison
//!
//! Hashing is CPU-bound and deliberately slow. Async callers should run
//! [`ClearTextPassword::hash`] and [`HashedPassword::verify`] on a
//! blocking thread.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::constant_time_eq;

// ============================================================================
// Constants
// ============================================================================

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MAX_PASSWORD_LENGTH: usize = 16;

/// The only non-alphanumeric characters a password may contain.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one number")]
    MissingDigit,

    #[error("Password must contain at least one of {}", PASSWORD_SYMBOLS)]
    MissingSymbol,

    /// Anything outside ASCII letters, digits and [`PASSWORD_SYMBOLS`]
    #[error("Password may only contain letters, numbers and {}", PASSWORD_SYMBOLS)]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a parseable PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Verification could not run (unsupported algorithm or parameters)
    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and `Debug` is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate a new password against the complexity policy.
    ///
    /// Input is NFKC-normalized first, so full-width forms of allowed
    /// characters are accepted as their ASCII equivalents. The first
    /// violation found is returned; [`policy_violations`] lists all of them.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self::candidate(raw);
        let first_violation = policy_violations(&candidate.0).into_iter().next();
        match first_violation {
            Some(violation) => Err(violation),
            None => Ok(candidate),
        }
    }

    /// A login candidate. No policy is applied: a candidate that breaks the
    /// policy simply fails to verify.
    pub fn candidate(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Constant-time equality, used for password confirmation checks.
    pub fn matches(&self, other: &ClearTextPassword) -> bool {
        constant_time_eq(self.as_bytes(), other.as_bytes())
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret appended before hashing
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = peppered(self, pepper);

        // 128-bit random salt
        let salt = SaltString::generate(OsRng);

        // OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
        let result = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        password_bytes.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Every policy rule `password` breaks, in a stable order.
pub fn policy_violations(password: &str) -> Vec<PasswordPolicyError> {
    let mut violations = Vec::new();
    let char_count = password.chars().count();

    if char_count < MIN_PASSWORD_LENGTH {
        violations.push(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: char_count,
        });
    }
    if char_count > MAX_PASSWORD_LENGTH {
        violations.push(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual: char_count,
        });
    }
    if password
        .chars()
        .any(|c| !c.is_ascii_alphanumeric() && !PASSWORD_SYMBOLS.contains(c))
    {
        violations.push(PasswordPolicyError::InvalidCharacter);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PasswordPolicyError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PasswordPolicyError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PasswordPolicyError::MissingDigit);
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        violations.push(PasswordPolicyError::MissingSymbol);
    }

    violations
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string carries algorithm, version, parameters, salt and hash,
/// so verification needs nothing else.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash.
    ///
    /// A mismatch is `Ok(false)`. A hash that cannot be parsed or checked
    /// is an error, never a silent `false`.
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
    ) -> Result<bool, PasswordHashError> {
        let parsed_hash =
            PasswordHash::new(&self.hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        let mut password_bytes = peppered(password, pepper);

        // Argon2 compares the output in constant time
        let result = match Argon2::default().verify_password(&password_bytes, &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::VerificationFailed(e.to_string())),
        };

        password_bytes.zeroize();
        result
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

fn peppered(password: &ClearTextPassword, pepper: Option<&[u8]>) -> Vec<u8> {
    let mut bytes = password.as_bytes().to_vec();
    if let Some(p) = pepper {
        bytes.extend_from_slice(p);
    }
    bytes
}

// ============================================================================
// Tests
// ============================================================================
