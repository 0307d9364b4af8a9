//! Review endpoint

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::review::{CreateReview, Review},
    AppState,
};

use super::{AppJson, AuthenticatedUser};

/// Submit a review for a book (one per user and book)
#[utoipa::path(
    post,
    path = "/books/{id}/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Malformed body, rating out of range or empty text"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Already reviewed")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    AppJson(review): AppJson<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let created = state
        .services
        .reviews
        .submit(claims.user_id, book_id, &review)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
