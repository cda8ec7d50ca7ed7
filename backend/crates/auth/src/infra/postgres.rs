//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::conversions::unique_violation;
use kernel::id::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id,
    name,
    email,
    password_hash,
    password_changed_at,
    avatar,
    role,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique index on `users.email` maps to `EmailTaken`.
fn map_write_error(err: sqlx::Error) -> AuthError {
    match unique_violation(&err) {
        Some(_) => AuthError::EmailTaken,
        None => AuthError::Database(err),
    }
}

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                name,
                email,
                password_hash,
                password_changed_at,
                avatar,
                role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password().as_phc_string())
        .bind(user.password_changed_at())
        .bind(user.avatar.as_deref())
        .bind(user.role.id())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::info!(user_id = %user.user_id, "User created");

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update_profile(&self, user: &User) -> AuthResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                avatar = $4,
                role = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.avatar.as_deref())
        .bind(user.role.id())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::UserNotFound);
        }

        Ok(())
    }

    async fn update_password(
        &self,
        user_id: &UserId,
        password: &UserPassword,
        changed_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                password_hash = $2,
                password_changed_at = $3,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password.as_phc_string())
        .bind(changed_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    password_changed_at: Option<DateTime<Utc>>,
    avatar: Option<String>,
    role: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_id(self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role id: {}", self.role)))?;
        let password = UserPassword::from_phc_string(self.password_hash)?;

        Ok(User::restore(
            UserId::from(self.id),
            UserName::from_db(self.name),
            Email::from_db(self.email),
            self.avatar,
            role,
            password,
            self.password_changed_at,
            self.created_at,
            self.updated_at,
        ))
    }
}
