//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateProfile, User, UserProfile},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT id, username, email, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::UserNotFound(format!("User with id {} not found", id)))
    }

    /// Create a user together with its profile
    pub async fn create_with_profile(&self, user: &CreateUser) -> AppResult<(User, UserProfile)> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, created_at)
            VALUES ($1, $2, NOW())
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("Username '{}' is already taken", user.username))
            }
            _ => AppError::Database(e),
        })?;

        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (user_id, bio, profile_picture)
            VALUES ($1, $2, '')
            RETURNING user_id, bio, profile_picture
            "#,
        )
        .bind(created.id)
        .bind(user.bio.as_deref().unwrap_or(""))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((created, profile))
    }

    pub async fn get_profile(&self, user_id: i32) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, bio, profile_picture FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::UserNotFound(format!("Profile for user {} not found", user_id)))
    }

    /// Update the provided profile fields, leaving the others untouched
    pub async fn update_profile(&self, user_id: i32, update: &UpdateProfile) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET bio = COALESCE($2, bio),
                profile_picture = COALESCE($3, profile_picture)
            WHERE user_id = $1
            RETURNING user_id, bio, profile_picture
            "#,
        )
        .bind(user_id)
        .bind(&update.bio)
        .bind(&update.profile_picture)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::UserNotFound(format!("Profile for user {} not found", user_id)))
    }
}
