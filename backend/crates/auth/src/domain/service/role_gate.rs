//! Role Gate
//!
//! Membership test of a role against an operation's allow-list.
//! Callers report `false` as 403.

use crate::domain::value_object::user_role::UserRole;

/// User administration.
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// `true` iff `role` is in `allowed`. An empty list admits nobody.
#[inline]
pub fn authorize(role: UserRole, allowed: &[UserRole]) -> bool {
    allowed.contains(&role)
}
