//! Authenticate Use Case
//!
//! Resolves a presented token to its user.

use std::sync::Arc;

use kernel::id::UserId;
use platform::token::TokenKeys;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::token_freshness::is_token_stale;
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    keys: Arc<TokenKeys>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, keys: Arc<TokenKeys>) -> Self {
        Self { user_repo, keys }
    }

    /// Signature and expiry first, then the user must still exist, then the
    /// token must not predate the user's last password change.
    pub async fn execute(&self, token: &str) -> AuthResult<User> {
        let claims = self.keys.verify(token)?;

        let user = self
            .user_repo
            .find_by_id(&UserId::from(claims.sub))
            .await?
            .ok_or(AuthError::TokenInvalid)?;

        if is_token_stale(claims.iat, user.password_changed_at()) {
            return Err(AuthError::TokenStale);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::domain::value_object::{
        email::Email,
        user_name::UserName,
        user_password::{RawPassword, UserPassword},
    };
    use crate::infra::memory::MemoryUserRepository;
    use chrono::{TimeDelta, Utc};

    async fn setup() -> (AuthenticateUseCase<MemoryUserRepository>, Arc<MemoryUserRepository>, Arc<TokenKeys>, User) {
        let keys = Arc::new(AuthConfig::development().token_keys().unwrap());
        let repo = Arc::new(MemoryUserRepository::new());
        let raw = RawPassword::new("Valid1Pass!".to_string()).unwrap();
        let user = User::new(
            UserName::new("Token User").unwrap(),
            Email::new("token@example.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        );
        repo.create(&user).await.unwrap();

        (AuthenticateUseCase::new(repo.clone(), keys.clone()), repo, keys, user)
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let (authenticate, _, keys, user) = setup().await;
        let token = keys.issue(user.user_id.into_uuid()).unwrap();

        let resolved = authenticate.execute(&token.token).await.unwrap();
        assert_eq!(resolved.user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let (authenticate, ..) = setup().await;
        assert!(matches!(
            authenticate.execute("not.a.jwt").await,
            Err(AuthError::TokenInvalid)
        ));
    }

    #[tokio::test]
    async fn test_deleted_user_token_is_invalid() {
        let (authenticate, repo, keys, user) = setup().await;
        let token = keys.issue(user.user_id.into_uuid()).unwrap();
        repo.delete(&user.user_id).await.unwrap();

        assert!(matches!(
            authenticate.execute(&token.token).await,
            Err(AuthError::TokenInvalid)
        ));
    }

    #[tokio::test]
    async fn test_token_before_password_change_is_stale() {
        let (authenticate, repo, keys, user) = setup().await;
        let t0 = Utc::now();

        let before = keys
            .issue_at(user.user_id.into_uuid(), t0 - TimeDelta::seconds(5))
            .unwrap();
        let after = keys
            .issue_at(user.user_id.into_uuid(), t0 + TimeDelta::seconds(5))
            .unwrap();
        repo.update_password(&user.user_id, user.password(), t0)
            .await
            .unwrap();

        assert!(matches!(
            authenticate.execute(&before.token).await,
            Err(AuthError::TokenStale)
        ));
        assert!(authenticate.execute(&after.token).await.is_ok());
    }
}
