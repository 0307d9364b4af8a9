//! Lendings repository: borrow and return transitions

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres, Row};

use super::books;
use crate::{
    error::{AppError, AppResult, Violation},
    models::lending::{Lending, LendingDetails},
};

/// Unique indexes guarding active loans
const ACTIVE_LOAN_CONSTRAINTS: &[(&str, Violation)] = &[
    ("lendings_active_user_book_key", Violation::AlreadyBorrowed),
    ("lendings_active_book_key", Violation::BookUnavailable),
];

const LENDING_COLUMNS: &str = "id, user_id, book_id, borrowed_on, due_date, returned, returned_on";

#[derive(Clone)]
pub struct LendingsRepository {
    pool: Pool<Postgres>,
}

impl LendingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Borrow a book: insert the active loan and mark the book borrowed,
    /// atomically
    pub async fn borrow(&self, user_id: i32, book_id: i32, loan_period_days: i64) -> AppResult<Lending> {
        let mut tx = self.pool.begin().await?;

        let state = books::lock_state(&mut tx, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let borrowed_on = Utc::now();
        let due_date = Lending::due_date_from(borrowed_on, loan_period_days);
        let next = state.borrow(user_id, due_date)?;

        let lending = sqlx::query_as::<_, Lending>(&format!(
            r#"
            INSERT INTO lendings (user_id, book_id, borrowed_on, due_date, returned)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING {}
            "#,
            LENDING_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(borrowed_on)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_constraint(e, ACTIVE_LOAN_CONSTRAINTS))?;

        if !books::set_status(&mut tx, book_id, state.status(), next.status()).await? {
            return Err(Violation::BookUnavailable.into());
        }

        tx.commit().await?;
        Ok(lending)
    }

    /// Return a book: close the caller's active loan and make the book
    /// available again. Nothing changes unless both writes succeed.
    pub async fn return_book(&self, user_id: i32, book_id: i32) -> AppResult<Lending> {
        let mut tx = self.pool.begin().await?;

        let state = books::lock_state(&mut tx, book_id)
            .await?
            .ok_or(Violation::NoActiveLoan)?;
        let next = state.return_by(user_id)?;

        let lending = sqlx::query_as::<_, Lending>(&format!(
            r#"
            UPDATE lendings
            SET returned = TRUE, returned_on = $3
            WHERE user_id = $1 AND book_id = $2 AND NOT returned
            RETURNING {}
            "#,
            LENDING_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(Violation::NoActiveLoan)?;

        if !books::set_status(&mut tx, book_id, state.status(), next.status()).await? {
            return Err(Violation::NoActiveLoan.into());
        }

        tx.commit().await?;
        Ok(lending)
    }

    /// Active loans of a user, newest first, flagged overdue against `now`
    pub async fn active_for_user(&self, user_id: i32, now: DateTime<Utc>) -> AppResult<Vec<LendingDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.user_id, l.book_id, l.borrowed_on, l.due_date,
                   l.returned, l.returned_on, b.title
            FROM lendings l
            JOIN books b ON b.id = l.book_id
            WHERE l.user_id = $1 AND NOT l.returned
            ORDER BY l.borrowed_on DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let lending = Lending::from_row(&row)?;
            result.push(LendingDetails::new(&lending, row.get("title"), now));
        }

        Ok(result)
    }
}
