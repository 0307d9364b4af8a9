//! Catalog browsing service

use crate::{
    error::AppResult,
    models::{
        book::{BookDetails, BookQuery, BookShort},
        genre::Genre,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Available books matching the text and genre filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<BookShort>> {
        let genre_id = query.genre_id()?;
        let pattern = query.text_pattern();

        self.repository
            .books
            .search_available(pattern.as_deref(), genre_id)
            .await
    }

    /// Book with its reviews. `viewer` is the authenticated caller, if any.
    pub async fn get_book(&self, id: i32, viewer: Option<i32>) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let reviews = self.repository.reviews.for_book(id).await?;

        let user_review = match viewer {
            Some(user_id) => self.repository.reviews.find(user_id, id).await?,
            None => None,
        };
        let can_review = viewer.is_some() && user_review.is_none();

        Ok(BookDetails {
            book,
            reviews,
            user_review,
            can_review,
        })
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }
}
