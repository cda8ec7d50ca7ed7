//! Update Password Use Case
//!
//! Changes the signed-in user's password. Tokens issued before the change
//! stop working; the caller gets a fresh one.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use platform::token::TokenKeys;

use crate::application::TokenOutput;
use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::service::credential;
use crate::error::{AuthError, AuthResult};

pub struct UpdatePasswordInput {
    pub current_password: String,
    pub password: String,
    pub password_confirm: String,
}

pub struct UpdatePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    keys: Arc<TokenKeys>,
}

impl<U> UpdatePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>, keys: Arc<TokenKeys>) -> Self {
        Self {
            user_repo,
            config,
            keys,
        }
    }

    pub async fn execute(
        &self,
        user_id: &UserId,
        input: UpdatePasswordInput,
    ) -> AuthResult<TokenOutput> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let pepper = self.config.pepper();

        if !credential::verify(input.current_password, user.password(), pepper).await? {
            return Err(AuthError::WrongCurrentPassword);
        }

        let now = Utc::now();
        credential::set_password(&mut user, input.password, input.password_confirm, pepper, now)
            .await?;

        let changed_at = user
            .password_changed_at()
            .ok_or_else(|| AuthError::Internal("Password change time not set".to_string()))?;

        self.user_repo
            .update_password(&user.user_id, user.password(), changed_at)
            .await?;

        let token = self.keys.issue_at(user.user_id.into_uuid(), now)?;

        Ok(TokenOutput { user, token })
    }
}
