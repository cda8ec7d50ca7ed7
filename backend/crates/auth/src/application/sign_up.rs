//! Sign Up Use Case
//!
//! Creates a new user account and signs them in.

use std::sync::Arc;

use kernel::validation::FieldErrors;
use platform::token::TokenKeys;

use crate::application::TokenOutput;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::service::credential;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
    keys: Arc<TokenKeys>,
}

impl<U> SignUpUseCase<U>
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

    /// Every invalid field is reported at once. A taken email is
    /// `EmailTaken`, detected by the store.
    pub async fn execute(&self, input: SignUpInput) -> AuthResult<TokenOutput> {
        let mut errors = FieldErrors::new();
        let name = errors.check("name", UserName::new(&input.name));
        let email = errors.check("email", Email::new(&input.email));
        let password =
            credential::check_new_password(&mut errors, input.password, input.password_confirm);
        errors.finish()?;

        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(AuthError::Internal("Sign up validation incomplete".to_string()));
        };

        let password_hash = credential::hash_password(password, self.config.pepper()).await?;
        let user = User::new(name, email, password_hash);

        self.user_repo.create(&user).await?;

        let token = self.keys.issue(user.user_id.into_uuid())?;

        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(TokenOutput { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::sign_in::{SignInInput, SignInUseCase};
    use crate::domain::repository::UserRepository as _;
    use crate::domain::value_object::user_role::UserRole;
    use crate::infra::memory::MemoryUserRepository;

    fn use_case() -> (SignUpUseCase<MemoryUserRepository>, Arc<TokenKeys>) {
        let config = Arc::new(AuthConfig::development());
        let keys = Arc::new(config.token_keys().unwrap());
        let repo = Arc::new(MemoryUserRepository::new());
        (SignUpUseCase::new(repo, config, keys.clone()), keys)
    }

    fn input(email: &str) -> SignUpInput {
        SignUpInput {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "Valid1Pass!".to_string(),
            password_confirm: "Valid1Pass!".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_issues_token_for_new_user() {
        let (sign_up, keys) = use_case();

        let output = sign_up.execute(input("New@Example.com")).await.unwrap();

        assert_eq!(output.user.email.as_str(), "new@example.com");
        assert_eq!(output.user.role, UserRole::User);
        assert!(output.user.password_changed_at().is_none());

        let claims = keys.verify(&output.token.token).unwrap();
        assert_eq!(claims.sub, output.user.user_id.into_uuid());
    }

    #[tokio::test]
    async fn test_sign_up_reports_all_invalid_fields() {
        let (sign_up, _) = use_case();

        let result = sign_up
            .execute(SignUpInput {
                name: "   ".to_string(),
                email: "not-an-email".to_string(),
                password: "weak".to_string(),
                password_confirm: "other".to_string(),
            })
            .await;

        let Err(AuthError::Validation(errors)) = result else {
            panic!("expected validation error, got {result:?}");
        };
        for field in ["name", "email", "password", "passwordConfirm"] {
            assert!(errors.contains_field(field), "{field}");
        }
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_conflicts() {
        let config = Arc::new(AuthConfig::development());
        let keys = Arc::new(config.token_keys().unwrap());
        let repo = Arc::new(MemoryUserRepository::new());
        let sign_up = SignUpUseCase::new(repo.clone(), config.clone(), keys.clone());
        let sign_in = SignInUseCase::new(repo.clone(), config, keys);

        let first = sign_up.execute(input("dup@example.com")).await.unwrap();

        let result = sign_up
            .execute(SignUpInput {
                name: "Second Comer".to_string(),
                password: "Other2Pass@".to_string(),
                password_confirm: "Other2Pass@".to_string(),
                ..input("DUP@example.com")
            })
            .await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));

        // the first account keeps its name and password
        let stored = repo
            .find_by_email(&Email::new("dup@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, first.user.user_id);
        assert_eq!(stored.name.as_str(), "Test User");

        let signed_in = sign_in
            .execute(SignInInput {
                email: "dup@example.com".to_string(),
                password: "Valid1Pass!".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(signed_in.user.user_id, first.user.user_id);

        let result = sign_in
            .execute(SignInInput {
                email: "dup@example.com".to_string(),
                password: "Other2Pass@".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
