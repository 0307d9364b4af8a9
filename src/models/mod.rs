//! Data models for Stacks

pub mod author;
pub mod book;
pub mod favorite;
pub mod genre;
pub mod lending;
pub mod purchase;
pub mod review;
pub mod user;

// Re-export commonly used types
pub use author::AuthorShort;
pub use book::{BookDetails, BookQuery, BookRef, BookShort, BookState, BookStatus};
pub use favorite::Favorite;
pub use genre::Genre;
pub use lending::{Lending, LendingDetails};
pub use purchase::{Purchase, PurchaseDetails};
pub use review::{CreateReview, Review, ReviewDetails};
pub use user::{User, UserClaims, UserProfile};
