//! Business logic services

pub mod catalog;
pub mod favorites;
pub mod lendings;
pub mod purchases;
pub mod reviews;
pub mod users;

use crate::{config::LendingConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub lendings: lendings::LendingsService,
    pub purchases: purchases::PurchasesService,
    pub favorites: favorites::FavoritesService,
    pub reviews: reviews::ReviewsService,
    pub users: users::UsersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, lending_config: LendingConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            lendings: lendings::LendingsService::new(repository.clone(), lending_config),
            purchases: purchases::PurchasesService::new(repository.clone()),
            favorites: favorites::FavoritesService::new(repository.clone()),
            reviews: reviews::ReviewsService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
