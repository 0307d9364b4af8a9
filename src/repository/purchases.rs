//! Purchases repository: buy transition

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use super::books;
use crate::{
    error::{AppError, AppResult, Violation},
    models::{
        book::BookRef,
        purchase::{Purchase, PurchaseDetails},
    },
};

/// Unique constraints guarding purchases
const PURCHASE_CONSTRAINTS: &[(&str, Violation)] = &[
    ("purchases_user_book_key", Violation::AlreadyPurchased),
    ("purchases_book_key", Violation::AlreadySold),
];

#[derive(Clone)]
pub struct PurchasesRepository {
    pool: Pool<Postgres>,
}

impl PurchasesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Buy a book: record the purchase and mark the book sold, atomically
    pub async fn buy(&self, user_id: i32, book_id: i32) -> AppResult<Purchase> {
        let mut tx = self.pool.begin().await?;

        let state = books::lock_state(&mut tx, book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;
        let next = state.buy(user_id)?;

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (user_id, book_id, purchased_on)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, book_id, purchased_on
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_constraint(e, PURCHASE_CONSTRAINTS))?;

        if !books::set_status(&mut tx, book_id, state.status(), next.status()).await? {
            return Err(Violation::NotAvailable.into());
        }

        tx.commit().await?;
        Ok(purchase)
    }

    /// Purchases of a user, newest first
    pub async fn for_user(&self, user_id: i32) -> AppResult<Vec<PurchaseDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.purchased_on, b.id AS book_id, b.title
            FROM purchases p
            JOIN books b ON b.id = p.book_id
            WHERE p.user_id = $1
            ORDER BY p.purchased_on DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| PurchaseDetails {
                id: r.get("id"),
                book: BookRef {
                    id: r.get("book_id"),
                    title: r.get("title"),
                },
                purchased_on: r.get("purchased_on"),
            })
            .collect())
    }
}
