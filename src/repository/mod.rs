//! Repository layer for database operations

pub mod books;
pub mod favorites;
pub mod genres;
pub mod lendings;
pub mod purchases;
pub mod reviews;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub genres: genres::GenresRepository,
    pub lendings: lendings::LendingsRepository,
    pub purchases: purchases::PurchasesRepository,
    pub favorites: favorites::FavoritesRepository,
    pub reviews: reviews::ReviewsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            lendings: lendings::LendingsRepository::new(pool.clone()),
            purchases: purchases::PurchasesRepository::new(pool.clone()),
            favorites: favorites::FavoritesRepository::new(pool.clone()),
            reviews: reviews::ReviewsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
