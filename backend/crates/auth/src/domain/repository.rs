//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_password::UserPassword};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. `AuthError::EmailTaken` if the email is in use.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Lookup by the lowercased email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// All users, oldest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Persist name, email, avatar and role. Never writes the password.
    ///
    /// `AuthError::UserNotFound` if the row is gone,
    /// `AuthError::EmailTaken` if the new email belongs to someone else.
    async fn update_profile(&self, user: &User) -> AuthResult<()>;

    /// Write hash and change time together in one statement.
    async fn update_password(
        &self,
        user_id: &UserId,
        password: &UserPassword,
        changed_at: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// `false` if there was no such user
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;
}
