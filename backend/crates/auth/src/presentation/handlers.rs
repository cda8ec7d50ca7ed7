//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use kernel::id::UserId;
use kernel::response::Envelope;
use kernel::validation::FieldError;
use platform::client::display_ip;
use platform::token::TokenKeys;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ManageUsersUseCase, SignInUseCase, SignUpUseCase, TokenOutput, UpdatePasswordUseCase,
    UpdateProfileUseCase,
};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginRequest, SignUpRequest, UpdatePasswordRequest, UpdateProfileRequest, UserData,
    UserResponse, UsersData,
};
use crate::presentation::middleware::{ClientIp, CurrentUser, require_auth, restrict_to};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub keys: Arc<TokenKeys>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    /// Fails when the configured token secret is too weak.
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let keys = config.token_keys()?;
        Ok(Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            keys: Arc::new(keys),
        })
    }

    /// Put `route` behind `require_auth`, and behind `restrict_to` when
    /// `allowed` is given.
    pub fn protect<S>(
        &self,
        route: MethodRouter<S>,
        allowed: Option<&'static [UserRole]>,
    ) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        // the layer added last runs first
        let route = match allowed {
            Some(allowed) => route.route_layer(from_fn_with_state(allowed, restrict_to)),
            None => route,
        };
        route.route_layer(from_fn_with_state(self.clone(), require_auth::<R>))
    }

    fn token_response(&self, status: StatusCode, output: TokenOutput) -> Response {
        let cookie = self.config.cookie_config().build_set_cookie(&output.token.token);
        let body = Envelope::data(UserData::from(&output.user)).with_token(output.token.token);

        (status, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
    }
}

fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    raw.parse()
        .map_err(|_| AuthError::Validation(FieldError::new("id", "Invalid user id").into()))
}

// ============================================================================
// Sign Up / Log In / Log Out
// ============================================================================

/// POST /signup
pub async fn sign_up<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone(), state.keys.clone());
    let output = use_case.execute(req.into()).await?;

    Ok(state.token_response(StatusCode::CREATED, output))
}

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ClientIp(client_ip): ClientIp,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone(), state.keys.clone());

    let output = use_case.execute(req.into()).await.inspect_err(|e| {
        if matches!(e, AuthError::InvalidCredentials) {
            tracing::info!(client_ip = %display_ip(client_ip), "Rejected login");
        }
    })?;

    Ok(state.token_response(StatusCode::OK, output))
}

/// GET /logout
///
/// Stateless tokens cannot be revoked; clearing the cookie is all there is.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let cookie = state.config.cookie_config().build_delete_cookie();

    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(Envelope::empty()))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /me
pub async fn get_me<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
) -> AuthResult<Json<Envelope<UserData>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = ManageUsersUseCase::new(state.repo.clone())
        .get(&current.user_id)
        .await?;

    Ok(Json(Envelope::data(UserData::from(&user))))
}

/// PATCH /me
pub async fn update_me<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<Envelope<UserData>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if req.has_password_fields() {
        return Err(AuthError::PasswordFieldsNotAllowed);
    }

    let user = UpdateProfileUseCase::new(state.repo.clone())
        .update_me(&current.user_id, req.into())
        .await?;

    Ok(Json(Envelope::data(UserData::from(&user))))
}

/// PATCH /me/password
pub async fn update_my_password<R>(
    State(state): State<AuthAppState<R>>,
    current: CurrentUser,
    Json(req): Json<UpdatePasswordRequest>,
) -> AuthResult<Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        UpdatePasswordUseCase::new(state.repo.clone(), state.config.clone(), state.keys.clone());
    let output = use_case.execute(&current.user_id, req.into()).await?;

    Ok(state.token_response(StatusCode::OK, output))
}

// ============================================================================
// Administration
// ============================================================================

/// GET /
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<Envelope<UsersData>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let users = ManageUsersUseCase::new(state.repo.clone()).list().await?;
    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok(Json(Envelope::list(users.len(), UsersData { users })))
}

/// GET /{id}
pub async fn get_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
) -> AuthResult<Json<Envelope<UserData>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;
    let user = ManageUsersUseCase::new(state.repo.clone()).get(&user_id).await?;

    Ok(Json(Envelope::data(UserData::from(&user))))
}

/// PATCH /{id}
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> AuthResult<Json<Envelope<UserData>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if req.has_password_fields() {
        return Err(AuthError::PasswordFieldsNotAllowed);
    }

    let user_id = parse_user_id(&id)?;
    let user = UpdateProfileUseCase::new(state.repo.clone())
        .update_user(&user_id, req.into())
        .await?;

    Ok(Json(Envelope::data(UserData::from(&user))))
}

/// DELETE /{id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<String>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = parse_user_id(&id)?;
    ManageUsersUseCase::new(state.repo.clone())
        .delete(&user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        let id = UserId::new();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);

        let Err(AuthError::Validation(errors)) = parse_user_id("5c8a1d5b0190b214360dc057") else {
            panic!("expected validation error");
        };
        assert!(errors.contains_field("id"));
    }
}
