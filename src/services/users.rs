//! Registration and profile service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateUser, ProfileOverview, UpdateProfile, User, UserProfile},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a user; the profile is created in the same transaction
    pub async fn register(&self, user: &CreateUser) -> AppResult<(User, UserProfile)> {
        user.validate()?;

        let (created, profile) = self.repository.users.create_with_profile(user).await?;
        tracing::info!(user_id = created.id, username = %created.username, "User registered");
        Ok((created, profile))
    }

    /// Profile page: loans (with overdue ones split out), purchases and favorites
    pub async fn profile_overview(&self, user_id: i32) -> AppResult<ProfileOverview> {
        let user = self.repository.users.get_by_id(user_id).await?;
        let profile = self.repository.users.get_profile(user_id).await?;

        let now = Utc::now();
        let borrowed = self.repository.lendings.active_for_user(user_id, now).await?;
        let overdue = borrowed.iter().filter(|l| l.is_overdue).cloned().collect();
        let purchased = self.repository.purchases.for_user(user_id).await?;
        let favorites = self.repository.favorites.books_for_user(user_id).await?;

        Ok(ProfileOverview {
            user,
            profile,
            borrowed,
            purchased,
            favorites,
            overdue,
        })
    }

    pub async fn update_profile(&self, user_id: i32, update: &UpdateProfile) -> AppResult<UserProfile> {
        update.validate()?;
        self.repository.users.update_profile(user_id, update).await
    }
}
