//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod manage_users;
pub mod sign_in;
pub mod sign_up;
pub mod update_password;
pub mod update_profile;

use platform::token::SignedToken;

use crate::domain::entity::user::User;

/// A user together with a freshly signed token for them.
#[derive(Debug)]
pub struct TokenOutput {
    pub user: User,
    pub token: SignedToken,
}

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use config::AuthConfig;
pub use manage_users::ManageUsersUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use update_password::{UpdatePasswordInput, UpdatePasswordUseCase};
pub use update_profile::{ProfileChanges, UpdateProfileUseCase};
