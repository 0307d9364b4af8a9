//! API handlers for Stacks REST endpoints

pub mod books;
pub mod favorites;
pub mod health;
pub mod lendings;
pub mod openapi;
pub mod purchases;
pub mod reviews;
pub mod users;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        claims_from_header(auth_header, &state.config.auth.jwt_secret).map(AuthenticatedUser)
    }
}

/// Caller identity for routes open to anonymous visitors.
///
/// No `Authorization` header means anonymous. A header that is present but
/// malformed, expired or badly signed is still rejected with 401.
pub struct MaybeAuthenticatedUser(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match parts.headers.get(AUTHORIZATION) {
            None => Ok(MaybeAuthenticatedUser(None)),
            Some(header) => claims_from_header(header, &state.config.auth.jwt_secret)
                .map(|claims| MaybeAuthenticatedUser(Some(claims))),
        }
    }
}

fn claims_from_header(header: &HeaderValue, secret: &str) -> Result<UserClaims, AppError> {
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

    UserClaims::from_token(token, secret).map_err(|e| AppError::Authentication(e.to_string()))
}

/// JSON body extractor whose rejections use the API error format
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Confirmation returned by book actions
#[derive(Serialize, ToSchema)]
pub struct ActionResponse {
    pub message: String,
}

impl ActionResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        .route("/genres", get(books::list_genres))
        // Book actions
        .route("/books/:id/borrow", post(lendings::borrow_book))
        .route("/books/:id/return", post(lendings::return_book))
        .route("/books/:id/buy", post(purchases::buy_book))
        .route("/books/:id/favorite", post(favorites::favorite_book))
        .route("/books/:id/reviews", post(reviews::create_review))
        // Users
        .route("/users", post(users::register))
        .route("/profile", get(users::get_profile).put(users::update_profile))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
