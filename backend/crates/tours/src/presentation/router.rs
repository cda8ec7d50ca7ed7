//! Tours and Reviews Routers

use auth::AuthAppState;
use auth::domain::repository::UserRepository;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::domain::repository::{ReviewRepository, TourRepository};
use crate::domain::services::{REVIEW_MODERATORS, REVIEWERS, TOUR_GUIDES, TOUR_STAFF};
use crate::presentation::handlers::{self, TourAppState};

/// Routes under `/api/v1/tours`. Reads are public; writes go through
/// `auth` and its role gate.
pub fn tours_router<T, U>(state: TourAppState<T>, auth: AuthAppState<U>) -> Router
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/",
            get(handlers::list_tours::<T>)
                .merge(auth.protect(post(handlers::create_tour::<T>), Some(TOUR_STAFF))),
        )
        .route("/top-5-cheap", get(handlers::top_cheap::<T>))
        .route("/tour-stats", get(handlers::tour_stats::<T>))
        .route("/tours-stats", get(handlers::tour_stats::<T>))
        .route(
            "/monthly-plan/{year}",
            auth.protect(get(handlers::monthly_plan::<T>), Some(TOUR_GUIDES)),
        )
        .route(
            "/{id}",
            get(handlers::get_tour::<T>).merge(auth.protect(
                patch(handlers::update_tour::<T>).delete(handlers::delete_tour::<T>),
                Some(TOUR_STAFF),
            )),
        )
        .route(
            "/{id}/reviews",
            get(handlers::list_tour_reviews::<T>)
                .merge(auth.protect(post(handlers::create_review::<T>), Some(REVIEWERS))),
        )
        .with_state(state)
}

/// Routes under `/api/v1/reviews`
pub fn reviews_router<T, U>(state: TourAppState<T>, auth: AuthAppState<U>) -> Router
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
    U: UserRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::list_reviews::<T>))
        .route(
            "/{id}",
            auth.protect(delete(handlers::delete_review::<T>), Some(REVIEW_MODERATORS)),
        )
        .with_state(state)
}
