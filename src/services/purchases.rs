//! Purchase service

use crate::{error::AppResult, models::purchase::Purchase, repository::Repository};

#[derive(Clone)]
pub struct PurchasesService {
    repository: Repository,
}

impl PurchasesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn buy(&self, user_id: i32, book_id: i32) -> AppResult<Purchase> {
        let purchase = self.repository.purchases.buy(user_id, book_id).await?;

        tracing::info!(user_id, book_id, purchase_id = purchase.id, "Book sold");
        Ok(purchase)
    }
}
