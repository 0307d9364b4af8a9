//! Reviews repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, Violation},
    models::review::{CreateReview, Review, ReviewDetails},
};

const REVIEW_COLUMNS: &str = "id, user_id, book_id, rating, review_text, created_at";

#[derive(Clone)]
pub struct ReviewsRepository {
    pool: Pool<Postgres>,
}

impl ReviewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// The review a user left on a book, if any
    pub async fn find(&self, user_id: i32, book_id: i32) -> AppResult<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE user_id = $1 AND book_id = $2",
            REVIEW_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    /// Insert a review; the unique constraint decides duplicates
    pub async fn create(&self, user_id: i32, book_id: i32, review: &CreateReview) -> AppResult<Review> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (user_id, book_id, rating, review_text, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(review.rating)
        .bind(&review.review_text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_constraint(e, &[("reviews_user_book_key", Violation::AlreadyReviewed)]))
    }

    /// All reviews of a book, newest first
    pub async fn for_book(&self, book_id: i32) -> AppResult<Vec<ReviewDetails>> {
        let reviews = sqlx::query_as::<_, ReviewDetails>(
            r#"
            SELECT r.id, r.user_id, u.username, r.rating, r.review_text, r.created_at
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.book_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }
}
