//! Review submission service

use validator::Validate;

use crate::{
    error::{AppError, AppResult, Violation},
    models::review::{CreateReview, Review},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReviewsService {
    repository: Repository,
}

impl ReviewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Submit the user's one review of a book
    pub async fn submit(&self, user_id: i32, book_id: i32, review: &CreateReview) -> AppResult<Review> {
        review.validate()?;

        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }

        if self.repository.reviews.find(user_id, book_id).await?.is_some() {
            return Err(Violation::AlreadyReviewed.into());
        }

        let created = self.repository.reviews.create(user_id, book_id, review).await?;
        tracing::info!(user_id, book_id, rating = created.rating, "Review submitted");
        Ok(created)
    }
}
