//! Registration and profile endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{CreateUser, ProfileOverview, UpdateProfile, User, UserProfile},
    AppState,
};

use super::{AppJson, AuthenticatedUser};

/// Registered user with its fresh profile
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub profile: UserProfile,
}

/// Register a user and create its profile
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(user): AppJson<CreateUser>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let (user, profile) = state.services.users.register(&user).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user, profile })))
}

/// Get the caller's profile with loans, purchases and favorites
#[utoipa::path(
    get,
    path = "/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile overview", body = ProfileOverview),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ProfileOverview>> {
    let overview = state.services.users.profile_overview(claims.user_id).await?;
    Ok(Json(overview))
}

/// Update the caller's bio or profile picture
#[utoipa::path(
    put,
    path = "/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(update): AppJson<UpdateProfile>,
) -> AppResult<Json<UserProfile>> {
    let profile = state
        .services
        .users
        .update_profile(claims.user_id, &update)
        .await?;
    Ok(Json(profile))
}
