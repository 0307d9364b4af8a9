//! Review model and submission request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Review model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub rating: i32,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
}

/// Review with the reviewer's username, for book detail pages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReviewDetails {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub rating: i32,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
}

/// Review submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    /// Rating from 1 to 5 stars
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "Review text cannot be empty"))]
    pub review_text: String,
}
