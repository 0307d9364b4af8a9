//! User, profile and token claim types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book::BookShort, lending::LendingDetails, purchase::PurchaseDetails};

/// Local identity row referenced by the ledger
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One-to-one profile created with the user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub user_id: i32,
    pub bio: String,
    /// Path or URL of the picture; image bytes are not stored here
    pub profile_picture: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 150, message = "Username must be 3 to 150 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
}

/// Update own profile request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 255, message = "Profile picture reference cannot exceed 255 characters"))]
    pub profile_picture: Option<String>,
}

/// Everything shown on a user's profile page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileOverview {
    pub user: User,
    pub profile: UserProfile,
    pub borrowed: Vec<LendingDetails>,
    pub purchased: Vec<PurchaseDetails>,
    pub favorites: Vec<BookShort>,
    pub overdue: Vec<LendingDetails>,
}

/// JWT claims issued by the auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Username
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Claims valid for `hours` from now
    pub fn new(user_id: i32, username: impl Into<String>, hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: username.into(),
            user_id,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(hours)).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
