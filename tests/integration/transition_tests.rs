//! Book transition tests against a real database
//!
//! Needs a reachable Postgres (`DATABASE_URL`, or the default config URL):
//! `cargo test --test transition_tests -- --ignored`

use sqlx::{postgres::PgPoolOptions, PgPool};
use stacks_server::{
    config::AppConfig,
    error::{AppError, AppResult, Violation},
    models::review::CreateReview,
    repository::Repository,
};

const LOAN_DAYS: i64 = 14;

async fn setup() -> (PgPool, Repository) {
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| AppConfig::default().database.url);
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    (pool.clone(), Repository::new(pool))
}

async fn insert_user(pool: &PgPool) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email)
        SELECT 'racer_' || u, 'racer_' || u || '@example.org'
        FROM (SELECT md5(random()::text || clock_timestamp()::text) AS u) s
        RETURNING id
        "#,
    )
    .fetch_one(pool)
    .await
    .expect("Failed to insert user")
}

async fn insert_book(pool: &PgPool) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO books (title, isbn, publish_year)
        VALUES ('Contested Copy', substr(md5(random()::text || clock_timestamp()::text), 1, 13), 2024)
        RETURNING id
        "#,
    )
    .fetch_one(pool)
    .await
    .expect("Failed to insert book")
}

async fn book_status(pool: &PgPool, book_id: i32) -> String {
    sqlx::query_scalar("SELECT status FROM books WHERE id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read status")
}

async fn active_loans(pool: &PgPool, book_id: i32) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM lendings WHERE book_id = $1 AND NOT returned")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count lendings")
}

async fn purchases(pool: &PgPool, book_id: i32) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE book_id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count purchases")
}

/// Exactly one side succeeds; the other returns the loser's violation
fn one_winner<T: std::fmt::Debug, U: std::fmt::Debug>(
    first: AppResult<T>,
    second: AppResult<U>,
) -> Violation {
    match (first, second) {
        (Ok(_), Err(AppError::Precondition(v))) | (Err(AppError::Precondition(v)), Ok(_)) => v,
        other => panic!("expected one success and one precondition failure, got {:?}", other),
    }
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_have_one_winner() {
    let (pool, repo) = setup().await;
    let (alice, bob) = (insert_user(&pool).await, insert_user(&pool).await);
    let book = insert_book(&pool).await;

    let (a, b) = tokio::join!(
        repo.lendings.borrow(alice, book, LOAN_DAYS),
        repo.lendings.borrow(bob, book, LOAN_DAYS),
    );

    assert_eq!(one_winner(a, b), Violation::BookUnavailable);
    assert_eq!(active_loans(&pool, book).await, 1);
    assert_eq!(book_status(&pool, book).await, "borrowed");
}

#[tokio::test]
#[ignore]
async fn test_same_user_double_borrow_race() {
    let (pool, repo) = setup().await;
    let alice = insert_user(&pool).await;
    let book = insert_book(&pool).await;

    let (a, b) = tokio::join!(
        repo.lendings.borrow(alice, book, LOAN_DAYS),
        repo.lendings.borrow(alice, book, LOAN_DAYS),
    );

    assert_eq!(one_winner(a, b), Violation::AlreadyBorrowed);
    assert_eq!(active_loans(&pool, book).await, 1);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_buys_have_one_winner() {
    let (pool, repo) = setup().await;
    let (alice, bob) = (insert_user(&pool).await, insert_user(&pool).await);
    let book = insert_book(&pool).await;

    let (a, b) = tokio::join!(repo.purchases.buy(alice, book), repo.purchases.buy(bob, book));

    assert_eq!(one_winner(a, b), Violation::AlreadySold);
    assert_eq!(purchases(&pool, book).await, 1);
    assert_eq!(book_status(&pool, book).await, "sold");
}

#[tokio::test]
#[ignore]
async fn test_buy_races_borrow() {
    let (pool, repo) = setup().await;
    let (alice, bob) = (insert_user(&pool).await, insert_user(&pool).await);
    let book = insert_book(&pool).await;

    let (bought, borrowed) = tokio::join!(
        repo.purchases.buy(alice, book),
        repo.lendings.borrow(bob, book, LOAN_DAYS),
    );
    let buy_won = bought.is_ok();

    let violation = one_winner(bought, borrowed);
    if buy_won {
        assert_eq!(violation, Violation::BookUnavailable);
        assert_eq!(active_loans(&pool, book).await, 0);
        assert_eq!(book_status(&pool, book).await, "sold");
    } else {
        assert_eq!(violation, Violation::NotAvailable);
        assert_eq!(purchases(&pool, book).await, 0);
        assert_eq!(book_status(&pool, book).await, "borrowed");
    }
}

#[tokio::test]
#[ignore]
async fn test_borrow_return_cycles() {
    let (pool, repo) = setup().await;
    let alice = insert_user(&pool).await;
    let book = insert_book(&pool).await;

    for _ in 0..2 {
        let lending = repo.lendings.borrow(alice, book, LOAN_DAYS).await.unwrap();
        assert_eq!((lending.due_date - lending.borrowed_on).num_days(), LOAN_DAYS);

        let returned = repo.lendings.return_book(alice, book).await.unwrap();
        assert!(returned.returned);
        assert!(returned.returned_on.is_some());
    }

    let err = repo.lendings.return_book(alice, book).await.unwrap_err();
    assert!(matches!(err, AppError::Precondition(Violation::NoActiveLoan)));
    assert_eq!(book_status(&pool, book).await, "available");
}

#[tokio::test]
#[ignore]
async fn test_return_by_other_user_changes_nothing() {
    let (pool, repo) = setup().await;
    let (alice, bob) = (insert_user(&pool).await, insert_user(&pool).await);
    let book = insert_book(&pool).await;

    repo.lendings.borrow(alice, book, LOAN_DAYS).await.unwrap();

    let err = repo.lendings.return_book(bob, book).await.unwrap_err();
    assert!(matches!(err, AppError::Precondition(Violation::NoActiveLoan)));
    assert_eq!(book_status(&pool, book).await, "borrowed");
    assert_eq!(active_loans(&pool, book).await, 1);

    let err = repo.lendings.return_book(bob, i32::MAX).await.unwrap_err();
    assert!(matches!(err, AppError::Precondition(Violation::NoActiveLoan)));
}

#[tokio::test]
#[ignore]
async fn test_unknown_user_cannot_borrow() {
    let (pool, repo) = setup().await;
    let book = insert_book(&pool).await;

    let err = repo.lendings.borrow(i32::MAX, book, LOAN_DAYS).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound(_)));
    assert_eq!(book_status(&pool, book).await, "available");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_inserts_map_to_violations() {
    let (pool, repo) = setup().await;
    let alice = insert_user(&pool).await;
    let book = insert_book(&pool).await;

    repo.favorites.create(alice, book).await.unwrap();
    let err = repo.favorites.create(alice, book).await.unwrap_err();
    assert!(matches!(err, AppError::Precondition(Violation::AlreadyFavorited)));

    let review = CreateReview {
        rating: 4,
        review_text: "Worth the wait".to_string(),
    };
    repo.reviews.create(alice, book, &review).await.unwrap();
    let err = repo.reviews.create(alice, book, &review).await.unwrap_err();
    assert!(matches!(err, AppError::Precondition(Violation::AlreadyReviewed)));
}
