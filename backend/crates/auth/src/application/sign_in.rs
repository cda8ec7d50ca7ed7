//! Sign In Use Case
//!
//! Checks email and password and issues a token.

use std::sync::Arc;

use kernel::validation::FieldErrors;
use platform::token::TokenKeys;

use crate::application::TokenOutput;
use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::service::credential;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    keys: Arc<TokenKeys>,
}

impl<U> SignInUseCase<U>
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

    /// Missing fields are a validation error. Every other failure is the
    /// same `InvalidCredentials`, whether the email is unknown or the
    /// password is wrong.
    pub async fn execute(&self, input: SignInInput) -> AuthResult<TokenOutput> {
        let mut errors = FieldErrors::new();
        if input.email.trim().is_empty() {
            errors.push("email", "Please provide email and password");
        }
        if input.password.is_empty() {
            errors.push("password", "Please provide email and password");
        }
        errors.finish()?;

        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_valid =
            credential::verify(input.password, user.password(), self.config.pepper()).await?;

        if !password_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.keys.issue(user.user_id.into_uuid())?;

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(TokenOutput { user, token })
    }
}
