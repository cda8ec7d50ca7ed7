//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{ReviewId, TourId};

use crate::domain::entities::{Review, Tour};
use crate::domain::services::RatingSummary;
use crate::error::TourResult;

/// Tour repository trait
#[trait_variant::make(TourRepository: Send)]
pub trait LocalTourRepository {
    /// Insert a new tour. `TourError::TourNameTaken` if the name is in use.
    async fn create(&self, tour: &Tour) -> TourResult<()>;

    async fn find_by_id(&self, tour_id: &TourId) -> TourResult<Option<Tour>>;

    /// All tours, newest first
    async fn list(&self) -> TourResult<Vec<Tour>>;

    /// Persist every client-editable field; ratings are left alone.
    ///
    /// `TourError::TourNotFound` if the row is gone,
    /// `TourError::TourNameTaken` if the new name belongs to another tour.
    async fn update(&self, tour: &Tour) -> TourResult<()>;

    /// Removes the tour and its reviews. `false` if there was no such tour.
    async fn delete(&self, tour_id: &TourId) -> TourResult<bool>;
}

/// Review repository trait
#[trait_variant::make(ReviewRepository: Send)]
pub trait LocalReviewRepository {
    /// `TourError::ReviewExists` if the author already reviewed the tour.
    async fn create_review(&self, review: &Review) -> TourResult<()>;

    async fn find_review(&self, review_id: &ReviewId) -> TourResult<Option<Review>>;

    /// Newest first; only the given tour's when `tour_id` is set.
    async fn list_reviews(&self, tour_id: Option<&TourId>) -> TourResult<Vec<Review>>;

    /// `false` if there was no such review
    async fn delete_review(&self, review_id: &ReviewId) -> TourResult<bool>;

    /// Recompute the tour's average and count from its current reviews and
    /// store them in the same step. Returns the stored summary, `None` if
    /// the tour is gone.
    async fn refresh_ratings(&self, tour_id: &TourId) -> TourResult<Option<RatingSummary>>;
}
