//! Favorites repository for database operations

use sqlx::{Pool, Postgres};

use super::books::{book_from_row, BOOK_COLUMNS, BOOK_JOINS};
use crate::{
    error::{AppError, AppResult, Violation},
    models::{book::BookShort, favorite::Favorite},
};

#[derive(Clone)]
pub struct FavoritesRepository {
    pool: Pool<Postgres>,
}

impl FavoritesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, user_id: i32, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a favorite; the unique constraint decides duplicates
    pub async fn create(&self, user_id: i32, book_id: i32) -> AppResult<Favorite> {
        sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (user_id, book_id) VALUES ($1, $2) RETURNING id, user_id, book_id",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_constraint(e, &[("favorites_user_book_key", Violation::AlreadyFavorited)])
        })
    }

    /// Books a user has favorited, by title
    pub async fn books_for_user(&self, user_id: i32) -> AppResult<Vec<BookShort>> {
        let sql = format!(
            r#"
            SELECT {} {}
            JOIN favorites f ON f.book_id = b.id
            WHERE f.user_id = $1
            ORDER BY b.title, b.id
            "#,
            BOOK_COLUMNS, BOOK_JOINS
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(book_from_row).collect())
    }
}
