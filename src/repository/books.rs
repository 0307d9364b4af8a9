//! Books repository: catalog reads and the book row lock used by transitions

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::AuthorShort,
        book::{BookShort, BookState, BookStateRow, BookStatus},
        genre::Genre,
    },
};

/// Columns read by [`book_from_row`]
pub(crate) const BOOK_COLUMNS: &str = r#"
    b.id, b.title, b.description, b.isbn, b.publish_year, b.cover_image, b.status,
    a.id AS author_id, a.first_name AS author_first_name, a.last_name AS author_last_name,
    g.id AS genre_id, g.name AS genre_name
"#;

pub(crate) const BOOK_JOINS: &str = r#"
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
    LEFT JOIN genres g ON g.id = b.genre_id
"#;

pub(crate) fn book_from_row(row: &PgRow) -> BookShort {
    let author = row
        .get::<Option<i32>, _>("author_id")
        .map(|id| AuthorShort {
            id,
            first_name: row.get("author_first_name"),
            last_name: row.get("author_last_name"),
        });
    let genre = row.get::<Option<i32>, _>("genre_id").map(|id| Genre {
        id,
        name: row.get("genre_name"),
    });

    BookShort::new(
        row.get("id"),
        row.get("title"),
        row.get("description"),
        row.get("isbn"),
        row.get("publish_year"),
        row.get("cover_image"),
        author,
        genre,
        row.get("status"),
    )
}

/// Read the book's current state and hold its row lock until the
/// transaction ends. `None` when the book does not exist.
///
/// The lock is taken on the bare row first. The holder rows are read by
/// later statements so they see every transaction that committed while
/// this one waited for the lock.
pub(crate) async fn lock_state(
    tx: &mut Transaction<'_, Postgres>,
    book_id: i32,
) -> AppResult<Option<BookState>> {
    let status: Option<BookStatus> =
        sqlx::query_scalar("SELECT status FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut **tx)
            .await?;

    let Some(status) = status else {
        return Ok(None);
    };

    let loan: Option<(i32, DateTime<Utc>)> = sqlx::query_as(
        "SELECT user_id, due_date FROM lendings WHERE book_id = $1 AND NOT returned",
    )
    .bind(book_id)
    .fetch_optional(&mut **tx)
    .await?;

    let purchaser_id: Option<i32> =
        sqlx::query_scalar("SELECT user_id FROM purchases WHERE book_id = $1")
            .bind(book_id)
            .fetch_optional(&mut **tx)
            .await?;

    BookState::try_from(BookStateRow {
        status,
        borrower_id: loan.map(|(user_id, _)| user_id),
        due_date: loan.map(|(_, due_date)| due_date),
        purchaser_id,
    })
    .map(Some)
}

/// Move the book from `from` to `to`. Returns false when the stored status
/// was not `from` anymore.
pub(crate) async fn set_status(
    tx: &mut Transaction<'_, Postgres>,
    book_id: i32,
    from: BookStatus,
    to: BookStatus,
) -> AppResult<bool> {
    let result = sqlx::query("UPDATE books SET status = $1 WHERE id = $2 AND status = $3")
        .bind(to)
        .bind(book_id)
        .bind(from)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected() == 1)
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID, whatever its status
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookShort> {
        let sql = format!("SELECT {} {} WHERE b.id = $1", BOOK_COLUMNS, BOOK_JOINS);

        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| book_from_row(&row))
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Available books, optionally filtered by an ILIKE pattern over title
    /// and author names, and by genre
    pub async fn search_available(
        &self,
        text_pattern: Option<&str>,
        genre_id: Option<i32>,
    ) -> AppResult<Vec<BookShort>> {
        let sql = format!(
            r#"
            SELECT {} {}
            WHERE b.status = $1
              AND ($2::text IS NULL
                   OR b.title ILIKE $2
                   OR a.first_name ILIKE $2
                   OR a.last_name ILIKE $2)
              AND ($3::int4 IS NULL OR b.genre_id = $3)
            ORDER BY b.title, b.id
            "#,
            BOOK_COLUMNS, BOOK_JOINS
        );

        let rows = sqlx::query(&sql)
            .bind(BookStatus::Available)
            .bind(text_pattern)
            .bind(genre_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(book_from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    use crate::config::AppConfig;

    // Run with: cargo test -- --ignored (needs DATABASE_URL)
    #[tokio::test]
    #[ignore]
    async fn test_set_status_checks_expected_status() {
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| AppConfig::default().database.url);
        let pool = PgPoolOptions::new().connect(&url).await.unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let book_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, isbn, publish_year)
            VALUES ('Status Check', substr(md5(random()::text), 1, 13), 2024)
            RETURNING id
            "#,
        )
        .fetch_one(&mut *tx)
        .await
        .unwrap();

        assert_eq!(lock_state(&mut tx, book_id).await.unwrap(), Some(BookState::Available));
        assert!(set_status(&mut tx, book_id, BookStatus::Available, BookStatus::Sold).await.unwrap());
        assert!(!set_status(&mut tx, book_id, BookStatus::Available, BookStatus::Borrowed).await.unwrap());
        assert_eq!(lock_state(&mut tx, i32::MAX).await.unwrap(), None);

        tx.rollback().await.unwrap();
    }
}
