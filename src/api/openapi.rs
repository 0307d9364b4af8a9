//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, favorites, health, lendings, purchases, reviews, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stacks API",
        version = "0.3.0",
        description = "Library catalog, lending and purchase REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        books::list_books,
        books::get_book,
        books::list_genres,
        // Book actions
        lendings::borrow_book,
        lendings::return_book,
        purchases::buy_book,
        favorites::favorite_book,
        reviews::create_review,
        // Users
        users::register,
        users::get_profile,
        users::update_profile,
    ),
    components(
        schemas(
            // Catalog
            crate::models::book::BookStatus,
            crate::models::book::BookRef,
            crate::models::book::BookShort,
            crate::models::book::BookDetails,
            crate::models::author::AuthorShort,
            crate::models::genre::Genre,
            // Ledger
            crate::models::lending::LendingDetails,
            crate::models::purchase::PurchaseDetails,
            crate::models::review::Review,
            crate::models::review::ReviewDetails,
            crate::models::review::CreateReview,
            // Users
            crate::models::user::User,
            crate::models::user::UserProfile,
            crate::models::user::CreateUser,
            crate::models::user::UpdateProfile,
            crate::models::user::ProfileOverview,
            users::RegisterResponse,
            // Misc
            crate::api::ActionResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog browsing"),
        (name = "lendings", description = "Borrowing and returning books"),
        (name = "purchases", description = "Buying books"),
        (name = "favorites", description = "Favorite books"),
        (name = "reviews", description = "Book reviews"),
        (name = "users", description = "Registration and profiles")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
