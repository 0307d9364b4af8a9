//! Purchase model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookRef;

/// Purchase model from database. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Purchase {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub purchased_on: DateTime<Utc>,
}

/// Purchase as listed on a profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseDetails {
    pub id: i32,
    pub book: BookRef,
    pub purchased_on: DateTime<Utc>,
}
