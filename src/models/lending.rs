//! Lending (borrow) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookRef;

/// Lending model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lending {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrowed_on: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned: bool,
    pub returned_on: Option<DateTime<Utc>>,
}

impl Lending {
    /// Due date for a loan starting at `borrowed_on`
    pub fn due_date_from(borrowed_on: DateTime<Utc>, loan_period_days: i64) -> DateTime<Utc> {
        borrowed_on + Duration::days(loan_period_days)
    }

    /// Overdue is computed on read: still out and past its due date
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.returned && self.due_date < now
    }
}

/// Active loan as listed on a profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LendingDetails {
    pub id: i32,
    pub book: BookRef,
    pub borrowed_on: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub is_overdue: bool,
}

impl LendingDetails {
    pub fn new(lending: &Lending, book_title: String, now: DateTime<Utc>) -> Self {
        Self {
            id: lending.id,
            book: BookRef {
                id: lending.book_id,
                title: book_title,
            },
            borrowed_on: lending.borrowed_on,
            due_date: lending.due_date,
            is_overdue: lending.is_overdue(now),
        }
    }
}
