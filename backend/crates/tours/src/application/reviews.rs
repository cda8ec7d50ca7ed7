//! Reviews Use Case
//!
//! Every write recomputes the reviewed tour's average and count from the
//! reviews that remain.

use std::sync::Arc;

use auth::UserRole;
use kernel::id::{ReviewId, TourId, UserId};

use crate::domain::entities::Review;
use crate::domain::repository::{ReviewRepository, TourRepository};
use crate::error::{TourError, TourResult};

#[derive(Debug, Clone, Default)]
pub struct CreateReviewInput {
    pub review: Option<String>,
    pub rating: Option<i16>,
}

pub struct ReviewsUseCase<R>
where
    R: TourRepository + ReviewRepository,
{
    repo: Arc<R>,
}

impl<R> ReviewsUseCase<R>
where
    R: TourRepository + ReviewRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All reviews, or one tour's when `tour_id` is set.
    pub async fn list(&self, tour_id: Option<&TourId>) -> TourResult<Vec<Review>> {
        if let Some(tour_id) = tour_id {
            self.ensure_tour(tour_id).await?;
        }
        self.repo.list_reviews(tour_id).await
    }

    pub async fn create(
        &self,
        tour_id: &TourId,
        author: &UserId,
        input: CreateReviewInput,
    ) -> TourResult<Review> {
        self.ensure_tour(tour_id).await?;

        let review = Review::new(*tour_id, *author, input.review, input.rating)?;
        self.repo.create_review(&review).await?;
        self.refresh_ratings(tour_id).await?;

        Ok(review)
    }

    /// Authors may delete their own review; admins any.
    pub async fn delete(
        &self,
        review_id: &ReviewId,
        actor: &UserId,
        actor_role: UserRole,
    ) -> TourResult<()> {
        let review = self
            .repo
            .find_review(review_id)
            .await?
            .ok_or(TourError::ReviewNotFound)?;

        if actor_role != UserRole::Admin && review.user_id != *actor {
            return Err(TourError::Forbidden);
        }

        if !self.repo.delete_review(review_id).await? {
            return Err(TourError::ReviewNotFound);
        }
        self.refresh_ratings(&review.tour_id).await?;

        tracing::info!(review_id = %review_id, tour_id = %review.tour_id, "Review deleted");

        Ok(())
    }

    async fn ensure_tour(&self, tour_id: &TourId) -> TourResult<()> {
        match self.repo.find_by_id(tour_id).await? {
            Some(_) => Ok(()),
            None => Err(TourError::TourNotFound),
        }
    }

    async fn refresh_ratings(&self, tour_id: &TourId) -> TourResult<()> {
        if self.repo.refresh_ratings(tour_id).await?.is_none() {
            tracing::warn!(tour_id = %tour_id, "Ratings not refreshed, tour is gone");
        }
        Ok(())
    }
}
