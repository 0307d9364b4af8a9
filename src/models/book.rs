//! Book model, lifecycle state and catalog query types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::{IntoParams, ToSchema};

use super::{
    author::AuthorShort,
    genre::Genre,
    review::{Review, ReviewDetails},
};
use crate::error::{AppError, AppResult, Violation};

/// Lifecycle column stored on the `books` row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Borrowed,
    Sold,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Borrowed => "borrowed",
            BookStatus::Sold => "sold",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(BookStatus::Available),
            "borrowed" => Ok(BookStatus::Borrowed),
            "sold" => Ok(BookStatus::Sold),
            _ => Err(format!("Invalid book status: {}", s)),
        }
    }
}

// SQLx conversion for BookStatus
impl sqlx::Type<Postgres> for BookStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Where a book is in its lifecycle.
///
/// A sold book can never be available, and a borrowed book always has
/// exactly one borrower, so the flag pair `is_available`/`is_sold` is derived
/// from this rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    Available,
    Borrowed { by: i32, due_date: DateTime<Utc> },
    Sold { to: i32 },
}

impl BookState {
    pub fn status(&self) -> BookStatus {
        match self {
            BookState::Available => BookStatus::Available,
            BookState::Borrowed { .. } => BookStatus::Borrowed,
            BookState::Sold { .. } => BookStatus::Sold,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, BookState::Available)
    }

    pub fn is_sold(&self) -> bool {
        matches!(self, BookState::Sold { .. })
    }

    /// Lend the book to `user_id` until `due_date`
    pub fn borrow(&self, user_id: i32, due_date: DateTime<Utc>) -> Result<BookState, Violation> {
        match *self {
            BookState::Available => Ok(BookState::Borrowed { by: user_id, due_date }),
            BookState::Borrowed { by, .. } if by == user_id => Err(Violation::AlreadyBorrowed),
            BookState::Borrowed { .. } | BookState::Sold { .. } => Err(Violation::BookUnavailable),
        }
    }

    /// Sell the book to `user_id`
    pub fn buy(&self, user_id: i32) -> Result<BookState, Violation> {
        match *self {
            BookState::Available => Ok(BookState::Sold { to: user_id }),
            BookState::Sold { to } if to == user_id => Err(Violation::AlreadyPurchased),
            BookState::Sold { .. } => Err(Violation::AlreadySold),
            BookState::Borrowed { .. } => Err(Violation::NotAvailable),
        }
    }

    /// Give the book back; only its current borrower can
    pub fn return_by(&self, user_id: i32) -> Result<BookState, Violation> {
        match *self {
            BookState::Borrowed { by, .. } if by == user_id => Ok(BookState::Available),
            _ => Err(Violation::NoActiveLoan),
        }
    }
}

/// Book status and whoever currently holds it, read under the row lock
#[derive(Debug, Clone)]
pub struct BookStateRow {
    pub status: BookStatus,
    pub borrower_id: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub purchaser_id: Option<i32>,
}

impl TryFrom<BookStateRow> for BookState {
    type Error = AppError;

    fn try_from(row: BookStateRow) -> Result<Self, Self::Error> {
        match (row.status, row.borrower_id, row.due_date, row.purchaser_id) {
            (BookStatus::Available, None, _, None) => Ok(BookState::Available),
            (BookStatus::Borrowed, Some(by), Some(due_date), None) => {
                Ok(BookState::Borrowed { by, due_date })
            }
            (BookStatus::Sold, None, _, Some(to)) => Ok(BookState::Sold { to }),
            (status, borrower, _, purchaser) => Err(AppError::Internal(format!(
                "Inconsistent book state: status={} borrower={:?} purchaser={:?}",
                status, borrower, purchaser
            ))),
        }
    }
}

/// Minimal book reference embedded in ledger listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub id: i32,
    pub title: String,
}

/// Book as shown in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub isbn: String,
    pub publish_year: i32,
    pub cover_image: String,
    pub author: Option<AuthorShort>,
    pub genre: Option<Genre>,
    pub status: BookStatus,
    pub is_available: bool,
    pub is_sold: bool,
}

impl BookShort {
    /// Build the catalog view; availability flags follow `status`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i32,
        title: String,
        description: String,
        isbn: String,
        publish_year: i32,
        cover_image: String,
        author: Option<AuthorShort>,
        genre: Option<Genre>,
        status: BookStatus,
    ) -> Self {
        Self {
            id,
            title,
            description,
            isbn,
            publish_year,
            cover_image,
            author,
            genre,
            status,
            is_available: status == BookStatus::Available,
            is_sold: status == BookStatus::Sold,
        }
    }
}

/// Book detail page: the book, its reviews, and whether the viewer may review it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub book: BookShort,
    pub reviews: Vec<ReviewDetails>,
    /// The viewer's own review, if they left one
    pub user_review: Option<Review>,
    /// True only for an authenticated viewer with no review yet
    pub can_review: bool,
}

/// Catalog query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive match on title or author first/last name
    pub q: Option<String>,
    /// Genre id, or `all` for no genre filter
    pub genre: Option<String>,
}

impl BookQuery {
    /// ILIKE pattern for the text filter, `None` when no text was given
    pub fn text_pattern(&self) -> Option<String> {
        self.q
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(q)))
    }

    /// Genre filter; `all` and an empty value mean "any genre"
    pub fn genre_id(&self) -> AppResult<Option<i32>> {
        match self.genre.as_deref() {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => raw
                .parse::<i32>()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("Invalid genre: {}", raw))),
        }
    }
}

/// Escape LIKE metacharacters so user input matches literally
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
