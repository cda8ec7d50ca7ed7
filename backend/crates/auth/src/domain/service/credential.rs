//! Credential Service
//!
//! Setting and checking user passwords. Argon2id hashing and verification
//! run on the blocking pool.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use kernel::validation::FieldErrors;

use crate::domain::entity::user::User;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::AuthResult;

/// `password_changed_at` is stored this far in the past so a token signed
/// in the same instant as the change still counts as issued after it.
pub const PASSWORD_CHANGE_SKEW: Duration = Duration::from_secs(1);

/// Record policy and confirmation failures for a new password into `errors`.
///
/// Both fields are reported when both are wrong.
pub fn check_new_password(
    errors: &mut FieldErrors,
    plaintext: String,
    confirm: String,
) -> Option<RawPassword> {
    let confirm_is_empty = confirm.is_empty();
    let confirm = RawPassword::candidate(confirm);
    let same = RawPassword::candidate(plaintext.clone()).matches(&confirm);

    let password = errors.check("password", RawPassword::new(plaintext));

    if confirm_is_empty {
        errors.push("passwordConfirm", "Please confirm your password");
    } else if !same {
        errors.push("passwordConfirm", "Passwords are not the same");
    }

    password.filter(|_| same)
}

pub fn validate_new_password(plaintext: String, confirm: String) -> Result<RawPassword, FieldErrors> {
    let mut errors = FieldErrors::new();
    match check_new_password(&mut errors, plaintext, confirm) {
        Some(password) if errors.is_empty() => Ok(password),
        _ => Err(errors),
    }
}

/// Hash off the dispatch path.
pub async fn hash_password(raw: RawPassword, pepper: Option<&[u8]>) -> AuthResult<UserPassword> {
    let pepper = pepper.map(<[u8]>::to_vec);
    tokio::task::spawn_blocking(move || UserPassword::from_raw(&raw, pepper.as_deref())).await?
}

/// Validate and hash a password for a user that does not exist yet.
pub async fn hash_new_password(
    plaintext: String,
    confirm: String,
    pepper: Option<&[u8]>,
) -> AuthResult<UserPassword> {
    let raw = validate_new_password(plaintext, confirm)?;
    hash_password(raw, pepper).await
}

/// Replace the password of an existing user.
///
/// On failure `user` is left untouched. On success the new hash is in
/// place and `password_changed_at` is `now` minus [`PASSWORD_CHANGE_SKEW`].
pub async fn set_password(
    user: &mut User,
    plaintext: String,
    confirm: String,
    pepper: Option<&[u8]>,
    now: DateTime<Utc>,
) -> AuthResult<()> {
    let hashed = hash_new_password(plaintext, confirm, pepper).await?;
    let skew = TimeDelta::from_std(PASSWORD_CHANGE_SKEW).unwrap_or(TimeDelta::zero());

    user.replace_password(hashed, now - skew);
    Ok(())
}

/// Check a login candidate against a stored hash.
///
/// A mismatch is `Ok(false)`. A stored hash that cannot be parsed or
/// checked is an error, never a silent `false`.
pub async fn verify(
    candidate: String,
    stored: &UserPassword,
    pepper: Option<&[u8]>,
) -> AuthResult<bool> {
    let candidate = RawPassword::candidate(candidate);
    let stored = stored.clone();
    let pepper = pepper.map(<[u8]>::to_vec);

    tokio::task::spawn_blocking(move || stored.verify(&candidate, pepper.as_deref())).await?
}
