//! Favorites service

use crate::{
    error::{AppError, AppResult, Violation},
    models::favorite::Favorite,
    repository::Repository,
};

#[derive(Clone)]
pub struct FavoritesService {
    repository: Repository,
}

impl FavoritesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to the user's favorites
    pub async fn add(&self, user_id: i32, book_id: i32) -> AppResult<Favorite> {
        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", book_id)));
        }

        // Early exit only; the unique constraint on insert is what holds under races
        if self.repository.favorites.exists(user_id, book_id).await? {
            return Err(Violation::AlreadyFavorited.into());
        }

        let favorite = self.repository.favorites.create(user_id, book_id).await?;
        tracing::debug!(user_id, book_id, "Book favorited");
        Ok(favorite)
    }
}
