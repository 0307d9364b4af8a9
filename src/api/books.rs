//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{BookDetails, BookQuery, BookShort},
        genre::Genre,
    },
    AppState,
};

use super::MaybeAuthenticatedUser;

/// List available books with optional text and genre filters
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Available books", body = Vec<BookShort>),
        (status = 400, description = "Invalid genre filter")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookShort>>> {
    let books = state.services.catalog.search_books(&query).await?;
    Ok(Json(books))
}

/// Get book details with reviews
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security((), ("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 401, description = "Token present but invalid"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    MaybeAuthenticatedUser(viewer): MaybeAuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let viewer_id = viewer.map(|claims| claims.user_id);

    let details = state.services.catalog.get_book(id, viewer_id).await?;
    Ok(Json(details))
}

/// List all genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "books",
    responses(
        (status = 200, description = "Genres ordered by name", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}
