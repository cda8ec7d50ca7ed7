//! Auth Middleware
//!
//! `require_auth` resolves the presented token to a [`CurrentUser`];
//! `restrict_to` then checks the user's role against an allow-list.
//! Handlers read the user back through the [`CurrentUser`] extractor.

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use kernel::id::UserId;
use platform::client::extract_client_ip;
use platform::cookie::extract_cookie;
use platform::token::extract_bearer;

use crate::application::AuthenticateUseCase;
use crate::domain::repository::UserRepository;
use crate::domain::service::role_gate::authorize;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// The authenticated caller, stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Client address, preferring `X-Forwarded-For` over the socket peer.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());

        Ok(Self(extract_client_ip(&parts.headers, direct)))
    }
}

/// Bearer header first, then the token cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    extract_bearer(headers).or_else(|| extract_cookie(headers, cookie_name))
}

/// Middleware that requires a valid, fresh token
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token =
        extract_token(req.headers(), &state.config.cookie_name).ok_or(AuthError::Unauthenticated)?;

    let user = AuthenticateUseCase::new(state.repo.clone(), state.keys.clone())
        .execute(&token)
        .await?;

    req.extensions_mut().insert(CurrentUser {
        user_id: user.user_id,
        role: user.role,
    });

    Ok(next.run(req).await)
}

/// Middleware that admits only the listed roles. Must run after `require_auth`.
pub async fn restrict_to(
    State(allowed): State<&'static [UserRole]>,
    current: CurrentUser,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    if !authorize(current.role, allowed) {
        tracing::debug!(user_id = %current.user_id, role = %current.role, "Role denied");
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}
