//! Update Profile Use Case
//!
//! Name, email and avatar for the signed-in user; administrators may also
//! change the role. Password fields never pass through here.

use std::sync::Arc;

use kernel::id::UserId;
use kernel::validation::FieldErrors;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Fields to change; `None` leaves the field as it is.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<String>,
}

pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Self-service update. A role change is `Forbidden`.
    pub async fn update_me(&self, user_id: &UserId, changes: ProfileChanges) -> AuthResult<User> {
        if changes.role.is_some() {
            return Err(AuthError::Forbidden);
        }
        self.apply(user_id, changes).await
    }

    /// Administrative update, role included.
    pub async fn update_user(&self, user_id: &UserId, changes: ProfileChanges) -> AuthResult<User> {
        self.apply(user_id, changes).await
    }

    async fn apply(&self, user_id: &UserId, changes: ProfileChanges) -> AuthResult<User> {
        let mut errors = FieldErrors::new();
        let name = changes
            .name
            .and_then(|name| errors.check("name", UserName::new(name)));
        let email = changes
            .email
            .and_then(|email| errors.check("email", Email::new(email)));
        let role = changes
            .role
            .and_then(|role| errors.check("role", role.parse::<UserRole>()));
        errors.finish()?;

        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(name) = name {
            user.set_name(name);
        }
        if let Some(email) = email {
            user.set_email(email);
        }
        if let Some(avatar) = changes.avatar {
            user.set_avatar(Some(avatar));
        }
        if let Some(role) = role {
            user.set_role(role);
        }

        self.user_repo.update_profile(&user).await?;

        tracing::debug!(user_id = %user.user_id, "Profile updated");

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::{RawPassword, UserPassword};
    use crate::infra::memory::MemoryUserRepository;

    async fn setup() -> (UpdateProfileUseCase<MemoryUserRepository>, Arc<MemoryUserRepository>, User) {
        let repo = Arc::new(MemoryUserRepository::new());
        let raw = RawPassword::new("Valid1Pass!".to_string()).unwrap();
        let user = User::new(
            UserName::new("Before").unwrap(),
            Email::new("before@example.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        );
        repo.create(&user).await.unwrap();
        (UpdateProfileUseCase::new(repo.clone()), repo, user)
    }

    #[tokio::test]
    async fn test_update_me_changes_profile_only() {
        let (use_case, repo, user) = setup().await;

        let updated = use_case
            .update_me(
                &user.user_id,
                ProfileChanges {
                    name: Some("After".to_string()),
                    email: Some("After@Example.com".to_string()),
                    avatar: Some("user-1.jpg".to_string()),
                    role: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_str(), "After");
        assert_eq!(updated.email.as_str(), "after@example.com");

        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.avatar.as_deref(), Some("user-1.jpg"));
        assert_eq!(stored.password().as_phc_string(), user.password().as_phc_string());
        assert!(stored.password_changed_at().is_none());
    }

    #[tokio::test]
    async fn test_update_me_cannot_change_role() {
        let (use_case, _, user) = setup().await;

        let result = use_case
            .update_me(
                &user.user_id,
                ProfileChanges {
                    role: Some("admin".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AuthError::Forbidden)));
    }

    #[tokio::test]
    async fn test_admin_can_change_role() {
        let (use_case, _, user) = setup().await;

        let updated = use_case
            .update_user(
                &user.user_id,
                ProfileChanges {
                    role: Some("lead-guide".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.role, UserRole::LeadGuide);
    }

    #[tokio::test]
    async fn test_invalid_fields_are_reported() {
        let (use_case, _, user) = setup().await;

        let result = use_case
            .update_user(
                &user.user_id,
                ProfileChanges {
                    email: Some("nope".to_string()),
                    role: Some("emperor".to_string()),
                    ..Default::default()
                },
            )
            .await;

        let Err(AuthError::Validation(errors)) = result else {
            panic!("expected validation error");
        };
        assert!(errors.contains_field("email"));
        assert!(errors.contains_field("role"));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (use_case, ..) = setup().await;
        let result = use_case
            .update_user(&UserId::new(), ProfileChanges::default())
            .await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }
}
