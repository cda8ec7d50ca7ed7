//! In-memory tour and review repository
//!
//! Backs the router tests and local runs without a database. Mirrors the
//! unique tour name, the one-review-per-user rule and the cascade from
//! tours to reviews.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::{ReviewId, TourId};
use tokio::sync::RwLock;

use crate::domain::entities::{Review, Tour};
use crate::domain::repository::{ReviewRepository, TourRepository};
use crate::domain::services::{RatingSummary, summarize_ratings};
use crate::error::{TourError, TourResult};

#[derive(Default)]
struct Store {
    tours: HashMap<TourId, Tour>,
    reviews: HashMap<ReviewId, Review>,
}

impl Store {
    fn name_in_use(&self, tour: &Tour) -> bool {
        self.tours
            .values()
            .any(|t| t.name == tour.name && t.id != tour.id)
    }
}

#[derive(Clone, Default)]
pub struct MemoryTourRepository {
    store: Arc<RwLock<Store>>,
}

impl MemoryTourRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TourRepository for MemoryTourRepository {
    async fn create(&self, tour: &Tour) -> TourResult<()> {
        let mut store = self.store.write().await;

        if store.name_in_use(tour) {
            return Err(TourError::TourNameTaken);
        }
        store.tours.insert(tour.id, tour.clone());

        Ok(())
    }

    async fn find_by_id(&self, tour_id: &TourId) -> TourResult<Option<Tour>> {
        Ok(self.store.read().await.tours.get(tour_id).cloned())
    }

    async fn list(&self) -> TourResult<Vec<Tour>> {
        let mut tours: Vec<Tour> = self.store.read().await.tours.values().cloned().collect();
        tours.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tours)
    }

    async fn update(&self, tour: &Tour) -> TourResult<()> {
        let mut store = self.store.write().await;

        if store.name_in_use(tour) {
            return Err(TourError::TourNameTaken);
        }
        let Some(existing) = store.tours.get_mut(&tour.id) else {
            return Err(TourError::TourNotFound);
        };
        let (average, quantity) = (existing.ratings_average, existing.ratings_quantity);
        *existing = tour.clone();
        existing.ratings_average = average;
        existing.ratings_quantity = quantity;

        Ok(())
    }

    async fn delete(&self, tour_id: &TourId) -> TourResult<bool> {
        let mut store = self.store.write().await;

        let removed = store.tours.remove(tour_id).is_some();
        store.reviews.retain(|_, r| r.tour_id != *tour_id);

        Ok(removed)
    }
}

impl ReviewRepository for MemoryTourRepository {
    async fn create_review(&self, review: &Review) -> TourResult<()> {
        let mut store = self.store.write().await;

        if store
            .reviews
            .values()
            .any(|r| r.tour_id == review.tour_id && r.user_id == review.user_id)
        {
            return Err(TourError::ReviewExists);
        }
        store.reviews.insert(review.id, review.clone());

        Ok(())
    }

    async fn find_review(&self, review_id: &ReviewId) -> TourResult<Option<Review>> {
        Ok(self.store.read().await.reviews.get(review_id).cloned())
    }

    async fn list_reviews(&self, tour_id: Option<&TourId>) -> TourResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .store
            .read()
            .await
            .reviews
            .values()
            .filter(|r| tour_id.is_none_or(|id| r.tour_id == *id))
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn delete_review(&self, review_id: &ReviewId) -> TourResult<bool> {
        Ok(self.store.write().await.reviews.remove(review_id).is_some())
    }

    async fn refresh_ratings(&self, tour_id: &TourId) -> TourResult<Option<RatingSummary>> {
        let mut guard = self.store.write().await;
        let Store { tours, reviews } = &mut *guard;

        let Some(tour) = tours.get_mut(tour_id) else {
            return Ok(None);
        };
        let summary = summarize_ratings(
            reviews
                .values()
                .filter(|r| r.tour_id == *tour_id)
                .map(|r| r.rating),
        );
        tour.set_ratings(summary);

        Ok(Some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TourInput;
    use kernel::id::UserId;

    fn tour(name: &str) -> Tour {
        Tour::create(TourInput {
            name: Some(name.to_string()),
            duration: Some(4),
            max_group_size: Some(8),
            difficulty: Some("medium".to_string()),
            price: Some(500.0),
            summary: Some("summary".to_string()),
            image_cover: Some("cover.jpg".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_tour_name_is_unique() {
        let repo = MemoryTourRepository::new();
        repo.create(&tour("The Sea Explorer")).await.unwrap();

        let result = repo.create(&tour("The Sea Explorer")).await;
        assert!(matches!(result, Err(TourError::TourNameTaken)));
    }

    #[tokio::test]
    async fn test_one_review_per_user_and_cascade() {
        let repo = MemoryTourRepository::new();
        let sea = tour("The Sea Explorer");
        repo.create(&sea).await.unwrap();
        let author = UserId::new();

        let first = Review::new(sea.id, author, Some("Lovely".into()), Some(4)).unwrap();
        repo.create_review(&first).await.unwrap();
        let second = Review::new(sea.id, author, Some("Again".into()), Some(2)).unwrap();
        assert!(matches!(
            repo.create_review(&second).await,
            Err(TourError::ReviewExists)
        ));

        let summary = repo.refresh_ratings(&sea.id).await.unwrap().unwrap();
        assert_eq!(summary.quantity, 1);
        assert_eq!(summary.average, 4.0);

        assert!(repo.delete(&sea.id).await.unwrap());
        assert!(repo.list_reviews(None).await.unwrap().is_empty());
        assert!(!repo.delete(&sea.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_keeps_ratings() {
        let repo = MemoryTourRepository::new();
        let mut sea = tour("The Sea Explorer");
        repo.create(&sea).await.unwrap();
        for rating in [2, 4] {
            let review = Review::new(sea.id, UserId::new(), Some("Fine".into()), Some(rating)).unwrap();
            repo.create_review(&review).await.unwrap();
        }
        repo.refresh_ratings(&sea.id).await.unwrap();

        sea.duration = 6;
        repo.update(&sea).await.unwrap();

        let stored = repo.find_by_id(&sea.id).await.unwrap().unwrap();
        assert_eq!(stored.duration, 6);
        assert_eq!(stored.ratings_quantity, 2);
        assert_eq!(stored.ratings_average, 3.0);
    }

    #[tokio::test]
    async fn test_refresh_after_interleaved_reviews() {
        let repo = MemoryTourRepository::new();
        let sea = tour("The Sea Explorer");
        repo.create(&sea).await.unwrap();

        let first = Review::new(sea.id, UserId::new(), Some("Superb".into()), Some(5)).unwrap();
        let second = Review::new(sea.id, UserId::new(), Some("Okay".into()), Some(3)).unwrap();
        repo.create_review(&first).await.unwrap();
        repo.create_review(&second).await.unwrap();

        // the earlier writer refreshing last still stores both reviews
        repo.refresh_ratings(&sea.id).await.unwrap();
        repo.refresh_ratings(&sea.id).await.unwrap();

        let stored = repo.find_by_id(&sea.id).await.unwrap().unwrap();
        assert_eq!(stored.ratings_quantity, 2);
        assert_eq!(stored.ratings_average, 4.0);

        assert_eq!(repo.refresh_ratings(&TourId::new()).await.unwrap(), None);
    }
}
