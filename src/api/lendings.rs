//! Borrow and return endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, AppState};

use super::{ActionResponse, AuthenticatedUser};

/// Borrow a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "lendings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book borrowed", body = ActionResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Book unavailable or already borrowed by caller")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<ActionResponse>> {
    state.services.lendings.borrow(claims.user_id, book_id).await?;
    Ok(Json(ActionResponse::new("Book borrowed successfully!")))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "lendings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ActionResponse),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Book not currently borrowed by caller")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<ActionResponse>> {
    state.services.lendings.return_book(claims.user_id, book_id).await?;
    Ok(Json(ActionResponse::new("Book returned successfully!")))
}
