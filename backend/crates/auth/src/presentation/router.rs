//! Auth Router

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::domain::repository::UserRepository;
use crate::domain::service::role_gate::ADMIN_ONLY;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the users router for any repository implementation
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", get(handlers::logout::<R>))
        .route(
            "/me",
            state.protect(
                get(handlers::get_me::<R>).patch(handlers::update_me::<R>),
                None,
            ),
        )
        .route(
            "/me/password",
            state.protect(patch(handlers::update_my_password::<R>), None),
        )
        .route(
            "/",
            state.protect(get(handlers::list_users::<R>), Some(ADMIN_ONLY)),
        )
        .route(
            "/{id}",
            state.protect(
                get(handlers::get_user::<R>)
                    .patch(handlers::update_user::<R>)
                    .delete(handlers::delete_user::<R>),
                Some(ADMIN_ONLY),
            ),
        )
        .with_state(state)
}
