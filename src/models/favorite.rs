//! Favorite model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
}
