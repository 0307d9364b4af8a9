//! API integration tests
//!
//! Run against a live server with a migrated database:
//! `cargo test -- --ignored`

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use stacks_server::models::UserClaims;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-this-secret-in-production".to_string())
}

/// Register a fresh user and return a bearer token for it
async fn register_user(client: &Client, prefix: &str) -> String {
    let username = format!(
        "{}_{}",
        prefix,
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    );

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.org", username),
        }))
        .send()
        .await
        .expect("Failed to send registration request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse registration response");
    let user_id = body["user"]["id"].as_i64().expect("No user id in response") as i32;

    UserClaims::new(user_id, username, 1)
        .create_token(&jwt_secret())
        .expect("Failed to sign token")
}

/// Id of the last available book in the catalog, if any is left
async fn available_book(client: &Client) -> Option<i64> {
    let books: Value = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    books.as_array()?.last()?["id"].as_i64()
}

async fn act(client: &Client, token: &str, book_id: i64, action: &str) -> reqwest::Response {
    client
        .post(format!("{}/books/{}/{}", BASE_URL, book_id, action))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
}

async fn error_name(response: reqwest::Response) -> String {
    let body: Value = response.json().await.expect("Failed to parse error body");
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_catalog_text_search() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?q=tolkien", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let books: Value = response.json().await.expect("Failed to parse response");
    for book in books.as_array().expect("Expected an array") {
        assert_eq!(book["is_available"], true);
        let last_name = book["author"]["last_name"].as_str().unwrap_or_default();
        let title = book["title"].as_str().unwrap_or_default();
        assert!(
            last_name.eq_ignore_ascii_case("tolkien") || title.to_lowercase().contains("tolkien"),
            "unexpected match: {}",
            title
        );
    }
}

#[tokio::test]
#[ignore]
async fn test_catalog_rejects_non_numeric_genre() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?genre=fantasy", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_borrow() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books/1/borrow", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_borrow_twice_then_return() {
    let client = Client::new();
    let token = register_user(&client, "borrower").await;
    let Some(book_id) = available_book(&client).await else {
        eprintln!("no available book left, skipping");
        return;
    };

    let response = act(&client, &token, book_id, "borrow").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = act(&client, &token, book_id, "borrow").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_name(response).await, "AlreadyBorrowed");

    // Another member sees the book as taken
    let other = register_user(&client, "other").await;
    let response = act(&client, &other, book_id, "borrow").await;
    assert_eq!(error_name(response).await, "BookUnavailable");
    let response = act(&client, &other, book_id, "return").await;
    assert_eq!(error_name(response).await, "NoActiveLoan");

    let profile: Value = client
        .get(format!("{}/profile", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(profile["borrowed"][0]["book"]["id"], book_id);

    let response = act(&client, &token, book_id, "return").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = act(&client, &token, book_id, "return").await;
    assert_eq!(error_name(response).await, "NoActiveLoan");
}

#[tokio::test]
#[ignore]
async fn test_buy_then_borrow_rejected() {
    let client = Client::new();
    let token = register_user(&client, "buyer").await;
    let Some(book_id) = available_book(&client).await else {
        eprintln!("no available book left, skipping");
        return;
    };

    let response = act(&client, &token, book_id, "buy").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = act(&client, &token, book_id, "buy").await;
    assert_eq!(error_name(response).await, "AlreadyPurchased");

    let response = act(&client, &token, book_id, "borrow").await;
    assert_eq!(error_name(response).await, "BookUnavailable");

    let other = register_user(&client, "latecomer").await;
    let response = act(&client, &other, book_id, "buy").await;
    assert_eq!(error_name(response).await, "AlreadySold");

    let detail: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(detail["book"]["is_sold"], true);
    assert_eq!(detail["book"]["is_available"], false);
}

#[tokio::test]
#[ignore]
async fn test_favorite_and_review_once() {
    let client = Client::new();
    let token = register_user(&client, "reader").await;

    let response = act(&client, &token, 1, "favorite").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = act(&client, &token, 1, "favorite").await;
    assert_eq!(error_name(response).await, "AlreadyFavorited");

    let review = json!({ "rating": 5, "review_text": "In a hole in the ground" });
    let response = client
        .post(format!("{}/books/1/reviews", BASE_URL))
        .bearer_auth(&token)
        .json(&review)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/books/1/reviews", BASE_URL))
        .bearer_auth(&token)
        .json(&review)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(error_name(response).await, "AlreadyReviewed");

    let detail: Value = client
        .get(format!("{}/books/1", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(detail["can_review"], false);
    assert_eq!(detail["user_review"]["rating"], 5);
}
