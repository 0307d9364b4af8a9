//! Borrow and return service

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::lending::Lending,
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingsService {
    repository: Repository,
    config: LendingConfig,
}

impl LendingsService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a book for the configured loan period
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<Lending> {
        let lending = self
            .repository
            .lendings
            .borrow(user_id, book_id, self.config.loan_period_days)
            .await?;

        tracing::info!(
            user_id,
            book_id,
            lending_id = lending.id,
            due_date = %lending.due_date,
            "Book borrowed"
        );
        Ok(lending)
    }

    /// Return a book the user currently has on loan
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<Lending> {
        let lending = self.repository.lendings.return_book(user_id, book_id).await?;

        tracing::info!(user_id, book_id, lending_id = lending.id, "Book returned");
        Ok(lending)
    }
}
