//! HTTP Handlers

use auth::CurrentUser;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::id::{Id, ReviewId, TourId};
use kernel::response::Envelope;
use kernel::validation::FieldError;
use std::sync::Arc;

use crate::application::config::TourConfig;
use crate::application::{ManageToursUseCase, ReviewsUseCase, TourInsightsUseCase};
use crate::domain::repository::{ReviewRepository, TourRepository};
use crate::error::{TourError, TourResult};
use crate::presentation::dto::{
    PlanData, ReviewData, ReviewRequest, ReviewResponse, ReviewsData, StatsData, TourData,
    TourRequest, ToursData,
};

/// Shared state for tour and review handlers
#[derive(Clone)]
pub struct TourAppState<T>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<T>,
    pub config: Arc<TourConfig>,
}

impl<T> TourAppState<T>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: T, config: TourConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }
}

fn parse_id<M>(field: &'static str, raw: &str) -> TourResult<Id<M>> {
    raw.parse().map_err(|_| {
        TourError::Validation(FieldError::new(field, format!("Invalid {field}: {raw}")).into())
    })
}

// ============================================================================
// Tours
// ============================================================================

/// GET /
pub async fn list_tours<T>(
    State(state): State<TourAppState<T>>,
) -> TourResult<Json<Envelope<ToursData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let tours = ManageToursUseCase::new(state.repo.clone()).list().await?;

    Ok(Json(Envelope::list(tours.len(), ToursData::from(tours.as_slice()))))
}

/// POST /
pub async fn create_tour<T>(
    State(state): State<TourAppState<T>>,
    Json(req): Json<TourRequest>,
) -> TourResult<(StatusCode, Json<Envelope<TourData>>)>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let tour = ManageToursUseCase::new(state.repo.clone())
        .create(req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(Envelope::data(TourData::from(&tour)))))
}

/// GET /{id}
pub async fn get_tour<T>(
    State(state): State<TourAppState<T>>,
    Path(id): Path<String>,
) -> TourResult<Json<Envelope<TourData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let tour_id: TourId = parse_id("id", &id)?;
    let tour = ManageToursUseCase::new(state.repo.clone()).get(&tour_id).await?;

    Ok(Json(Envelope::data(TourData::from(&tour))))
}

/// PATCH /{id}
pub async fn update_tour<T>(
    State(state): State<TourAppState<T>>,
    Path(id): Path<String>,
    Json(req): Json<TourRequest>,
) -> TourResult<Json<Envelope<TourData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let tour_id: TourId = parse_id("id", &id)?;
    let tour = ManageToursUseCase::new(state.repo.clone())
        .update(&tour_id, req.into())
        .await?;

    Ok(Json(Envelope::data(TourData::from(&tour))))
}

/// DELETE /{id}
pub async fn delete_tour<T>(
    State(state): State<TourAppState<T>>,
    Path(id): Path<String>,
) -> TourResult<StatusCode>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let tour_id: TourId = parse_id("id", &id)?;
    ManageToursUseCase::new(state.repo.clone())
        .delete(&tour_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Insights
// ============================================================================

/// GET /top-5-cheap
pub async fn top_cheap<T>(
    State(state): State<TourAppState<T>>,
) -> TourResult<Json<Envelope<ToursData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let tours = TourInsightsUseCase::new(state.repo.clone(), state.config.clone())
        .top_cheap()
        .await?;

    Ok(Json(Envelope::list(tours.len(), ToursData::from(tours.as_slice()))))
}

/// GET /tour-stats
pub async fn tour_stats<T>(
    State(state): State<TourAppState<T>>,
) -> TourResult<Json<Envelope<StatsData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let stats = TourInsightsUseCase::new(state.repo.clone(), state.config.clone())
        .stats()
        .await?;

    Ok(Json(Envelope::data(StatsData { stats })))
}

/// GET /monthly-plan/{year}
pub async fn monthly_plan<T>(
    State(state): State<TourAppState<T>>,
    Path(year): Path<String>,
) -> TourResult<Json<Envelope<PlanData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let year: i32 = year.parse().map_err(|_| {
        TourError::Validation(FieldError::new("year", "Year must be a number").into())
    })?;
    let plan = TourInsightsUseCase::new(state.repo.clone(), state.config.clone())
        .monthly_plan(year)
        .await?;

    Ok(Json(Envelope::data(PlanData { plan })))
}

// ============================================================================
// Reviews
// ============================================================================

async fn list_reviews_for<T>(
    state: &TourAppState<T>,
    tour_id: Option<&TourId>,
) -> TourResult<Json<Envelope<ReviewsData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let reviews = ReviewsUseCase::new(state.repo.clone()).list(tour_id).await?;
    let reviews: Vec<ReviewResponse> = reviews.iter().map(ReviewResponse::from).collect();

    Ok(Json(Envelope::list(reviews.len(), ReviewsData { reviews })))
}

/// GET /
pub async fn list_reviews<T>(
    State(state): State<TourAppState<T>>,
) -> TourResult<Json<Envelope<ReviewsData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    list_reviews_for(&state, None).await
}

/// GET /{id}/reviews
pub async fn list_tour_reviews<T>(
    State(state): State<TourAppState<T>>,
    Path(id): Path<String>,
) -> TourResult<Json<Envelope<ReviewsData>>>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let tour_id: TourId = parse_id("id", &id)?;
    list_reviews_for(&state, Some(&tour_id)).await
}

/// POST /{id}/reviews
pub async fn create_review<T>(
    State(state): State<TourAppState<T>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> TourResult<(StatusCode, Json<Envelope<ReviewData>>)>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let tour_id: TourId = parse_id("id", &id)?;
    let review = ReviewsUseCase::new(state.repo.clone())
        .create(&tour_id, &current.user_id, req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(ReviewData {
            review: ReviewResponse::from(&review),
        })),
    ))
}

/// DELETE /{id}
pub async fn delete_review<T>(
    State(state): State<TourAppState<T>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> TourResult<StatusCode>
where
    T: TourRepository + ReviewRepository + Clone + Send + Sync + 'static,
{
    let review_id: ReviewId = parse_id("id", &id)?;
    ReviewsUseCase::new(state.repo.clone())
        .delete(&review_id, &current.user_id, current.role)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = TourId::new();
        let parsed: TourId = parse_id("id", &id.to_string()).unwrap();
        assert_eq!(parsed, id);

        let Err(TourError::Validation(errors)) =
            parse_id::<kernel::id::markers::Tour>("id", "5c88fa8cf4afda39709c2955")
        else {
            panic!("expected validation error");
        };
        assert!(errors.contains_field("id"));
    }
}
