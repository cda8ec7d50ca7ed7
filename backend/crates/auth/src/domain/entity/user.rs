//! User Entity
//!
//! The password hash and its change timestamp are private. They move
//! together through [`User::replace_password`], which only the credential
//! service calls.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: UserName,
    /// Lowercased; unique across users
    pub email: Email,
    /// Image reference, not validated
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    password: UserPassword,
    password_changed_at: Option<DateTime<Utc>>,
}

impl User {
    /// A freshly registered user. `password_changed_at` stays unset.
    pub fn new(name: UserName, email: Email, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            avatar: None,
            role: UserRole::default(),
            created_at: now,
            updated_at: now,
            password,
            password_changed_at: None,
        }
    }

    /// Rebuild from storage.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        user_id: UserId,
        name: UserName,
        email: Email,
        avatar: Option<String>,
        role: UserRole,
        password: UserPassword,
        password_changed_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            name,
            email,
            avatar,
            role,
            created_at,
            updated_at,
            password,
            password_changed_at,
        }
    }

    pub fn password(&self) -> &UserPassword {
        &self.password
    }

    pub fn password_changed_at(&self) -> Option<DateTime<Utc>> {
        self.password_changed_at
    }

    pub(crate) fn replace_password(&mut self, password: UserPassword, changed_at: DateTime<Utc>) {
        self.password = password;
        self.password_changed_at = Some(changed_at);
        self.updated_at = Utc::now();
    }

    pub fn set_name(&mut self, name: UserName) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}
