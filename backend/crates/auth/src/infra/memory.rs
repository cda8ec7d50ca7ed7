//! In-memory user repository
//!
//! Backs the router tests and local runs without a database. Enforces the
//! same email uniqueness as the `users_email_key` index.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_in_use(users: &HashMap<UserId, User>, email: &Email, except: &UserId) -> bool {
        users
            .values()
            .any(|u| u.email == *email && u.user_id != *except)
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        if Self::email_in_use(&users, &user.email, &user.user_id) {
            return Err(AuthError::EmailTaken);
        }
        users.insert(user.user_id, user.clone());

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_profile(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        if Self::email_in_use(&users, &user.email, &user.user_id) {
            return Err(AuthError::EmailTaken);
        }
        let stored = users.get_mut(&user.user_id).ok_or(AuthError::UserNotFound)?;

        stored.name = user.name.clone();
        stored.email = user.email.clone();
        stored.avatar = user.avatar.clone();
        stored.role = user.role;
        stored.updated_at = user.updated_at;

        Ok(())
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        password: &UserPassword,
        changed_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(user_id).ok_or(AuthError::UserNotFound)?;

        stored.replace_password(password.clone(), changed_at);

        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        Ok(self.users.write().await.remove(user_id).is_some())
    }
}
