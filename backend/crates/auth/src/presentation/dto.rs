//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::{ProfileChanges, SignInInput, SignUpInput, UpdatePasswordInput};
use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Sign Up / Log In
// ============================================================================

/// Missing fields deserialize as empty and fail validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl From<SignUpRequest> for SignUpInput {
    fn from(req: SignUpRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            password_confirm: req.password_confirm,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<LoginRequest> for SignInInput {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

// ============================================================================
// Password Change
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub password_current: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl From<UpdatePasswordRequest> for UpdatePasswordInput {
    fn from(req: UpdatePasswordRequest) -> Self {
        Self {
            current_password: req.password_current,
            password: req.password,
            password_confirm: req.password_confirm,
        }
    }
}

// ============================================================================
// Profile Updates
// ============================================================================

/// PATCH /me and PATCH /{id}
///
/// Password fields are captured only so the handler can refuse them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<String>,
    pub password: Option<serde_json::Value>,
    pub password_confirm: Option<serde_json::Value>,
}

impl UpdateProfileRequest {
    pub fn has_password_fields(&self) -> bool {
        self.password.is_some() || self.password_confirm.is_some()
    }
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            avatar: req.avatar,
            role: req.role,
        }
    }
}

// ============================================================================
// User Info
// ============================================================================

/// Public view of a user. Never carries password material.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.name.to_string(),
            email: user.email.to_string(),
            avatar: user.avatar.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserData {
    pub user: UserResponse,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            user: UserResponse::from(user),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersData {
    pub users: Vec<UserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_up_request_camel_case() {
        let req: SignUpRequest = serde_json::from_str(
            r#"{"name":"A","email":"a@b.io","password":"x","passwordConfirm":"y"}"#,
        )
        .unwrap();
        assert_eq!(req.password_confirm, "y");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
    }

    #[test]
    fn test_password_fields_are_detected() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"A","passwordConfirm":"x"}"#).unwrap();
        assert!(req.has_password_fields());

        let req: UpdateProfileRequest = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert!(!req.has_password_fields());
    }
}
