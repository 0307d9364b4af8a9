//! Purchase endpoint

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, AppState};

use super::{ActionResponse, AuthenticatedUser};

/// Buy a book
#[utoipa::path(
    post,
    path = "/books/{id}/buy",
    tag = "purchases",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book purchased", body = ActionResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Book sold, not available, or already purchased by caller")
    )
)]
pub async fn buy_book(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<ActionResponse>> {
    state.services.purchases.buy(claims.user_id, book_id).await?;
    Ok(Json(ActionResponse::new("Book purchased successfully!")))
}
