//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, credential services, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign up / log in with email + password, HS256 tokens in body and cookie
//! - Password change that invalidates every earlier token
//! - Role-based access (User, Guide, LeadGuide, Admin)
//! - Administrative user management
//!
//! ## Security Model
//! - Passwords hashed with Argon2id on the blocking pool
//! - Tokens older than the last password change are rejected
//! - Every authentication failure renders the same generic message

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::value_object::user_role::UserRole;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::MemoryUserRepository, postgres::PgUserRepository};
pub use presentation::{AuthAppState, CurrentUser, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::user::User;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
