//! Token Freshness
//!
//! A token signed before the user's last password change is stale even
//! when its signature and expiry are fine.

use chrono::{DateTime, Utc};

/// `true` iff the token was issued strictly before `password_changed_at`.
///
/// `issued_at` is the `iat` claim in epoch seconds. The change time keeps
/// its milliseconds, so a token from the same second as the change only
/// counts as stale if it really came earlier.
pub fn is_token_stale(issued_at: i64, password_changed_at: Option<DateTime<Utc>>) -> bool {
    let Some(changed_at) = password_changed_at else {
        return false;
    };

    i128::from(issued_at) * 1000 < i128::from(changed_at.timestamp_millis())
}
