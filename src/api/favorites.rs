//! Favorite endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, AppState};

use super::{ActionResponse, AuthenticatedUser};

/// Add a book to the caller's favorites
#[utoipa::path(
    post,
    path = "/books/{id}/favorite",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book favorited", body = ActionResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Already favorited")
    )
)]
pub async fn favorite_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<ActionResponse>> {
    state.services.favorites.add(claims.user_id, book_id).await?;
    Ok(Json(ActionResponse::new("Book added to favorites!")))
}
