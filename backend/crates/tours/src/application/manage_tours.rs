//! Manage Tours Use Case
//!
//! Tour listing, lookup and staff edits.

use std::sync::Arc;

use kernel::id::TourId;

use crate::domain::entities::{Tour, TourInput};
use crate::domain::repository::TourRepository;
use crate::error::{TourError, TourResult};

pub struct ManageToursUseCase<T>
where
    T: TourRepository,
{
    tour_repo: Arc<T>,
}

impl<T> ManageToursUseCase<T>
where
    T: TourRepository,
{
    pub fn new(tour_repo: Arc<T>) -> Self {
        Self { tour_repo }
    }

    pub async fn list(&self) -> TourResult<Vec<Tour>> {
        self.tour_repo.list().await
    }

    pub async fn get(&self, tour_id: &TourId) -> TourResult<Tour> {
        self.tour_repo
            .find_by_id(tour_id)
            .await?
            .ok_or(TourError::TourNotFound)
    }

    pub async fn create(&self, input: TourInput) -> TourResult<Tour> {
        let tour = Tour::create(input)?;
        self.tour_repo.create(&tour).await?;

        Ok(tour)
    }

    /// Unknown tour wins over invalid input.
    pub async fn update(&self, tour_id: &TourId, changes: TourInput) -> TourResult<Tour> {
        let mut tour = self.get(tour_id).await?;
        tour.apply(changes)?;
        self.tour_repo.update(&tour).await?;

        tracing::info!(tour_id = %tour_id, "Tour updated");

        Ok(tour)
    }

    pub async fn delete(&self, tour_id: &TourId) -> TourResult<()> {
        if !self.tour_repo.delete(tour_id).await? {
            return Err(TourError::TourNotFound);
        }

        tracing::info!(tour_id = %tour_id, "Tour deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryTourRepository;

    fn input(name: &str) -> TourInput {
        TourInput {
            name: Some(name.to_string()),
            duration: Some(7),
            max_group_size: Some(15),
            difficulty: Some("medium".to_string()),
            price: Some(497.0),
            summary: Some("Exploring the jaw-dropping US east coast".to_string()),
            image_cover: Some("tour-2-cover.jpg".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let manage = ManageToursUseCase::new(Arc::new(MemoryTourRepository::new()));

        let tour = manage.create(input("The Sea Explorer")).await.unwrap();
        assert_eq!(manage.get(&tour.id).await.unwrap(), tour);

        let updated = manage
            .update(
                &tour.id,
                TourInput {
                    price: Some(597.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 597.0);
        assert_eq!(manage.get(&tour.id).await.unwrap().price, 597.0);

        manage.delete(&tour.id).await.unwrap();
        assert!(matches!(manage.get(&tour.id).await, Err(TourError::TourNotFound)));
        assert!(matches!(manage.delete(&tour.id).await, Err(TourError::TourNotFound)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_and_duplicate() {
        let manage = ManageToursUseCase::new(Arc::new(MemoryTourRepository::new()));

        let result = manage.create(TourInput::default()).await;
        assert!(matches!(result, Err(TourError::Validation(_))));

        manage.create(input("The Sea Explorer")).await.unwrap();
        let result = manage.create(input("The Sea Explorer")).await;
        assert!(matches!(result, Err(TourError::TourNameTaken)));
    }

    #[tokio::test]
    async fn test_update_unknown_tour() {
        let manage = ManageToursUseCase::new(Arc::new(MemoryTourRepository::new()));

        let result = manage.update(&TourId::new(), TourInput::default()).await;
        assert!(matches!(result, Err(TourError::TourNotFound)));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let manage = ManageToursUseCase::new(Arc::new(MemoryTourRepository::new()));
        manage.create(input("The Sea Explorer")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        manage.create(input("The Forest Hiker")).await.unwrap();

        let tours = manage.list().await.unwrap();
        assert_eq!(tours[0].name.as_str(), "The Forest Hiker");
    }
}
