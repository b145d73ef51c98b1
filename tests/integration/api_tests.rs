//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Suffix keeping emails and ISBNs unique across runs
fn unique() -> String {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default().to_string()
}

/// Register a fresh librarian and return its token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Front Desk",
            "email": format!("desk{}@library.org", unique()),
            "password": "long-enough-password"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse register response");
    body["access_token"].as_str().expect("No token in response").to_string()
}

async fn create_book(client: &Client, token: &str, copies: i32) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": "The Left Hand of Darkness",
            "author": "Ursula K. Le Guin",
            "publication_year": 1969,
            "copies_count": copies
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn create_reader(client: &Client, token: &str) -> Value {
    let response = client
        .post(format!("{}/readers", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": "Ada Lovelace",
            "email": format!("ada{}@example.org", unique())
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn borrow(client: &Client, token: &str, book: &Value, reader: &Value) -> reqwest::Response {
    client
        .post(format!("{}/borrows", BASE_URL))
        .bearer_auth(token)
        .json(&json!({"book_id": book["id"], "reader_id": reader["id"]}))
        .send()
        .await
        .expect("Failed to send request")
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
async fn test_ready_reaches_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_register_then_login() {
    let client = Client::new();
    let email = format!("login{}@library.org", unique());

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({"name": "Desk", "email": email, "password": "s3cret-pass"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({"email": email, "password": "s3cret-pass"}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "bearer");

    let token = body["access_token"].as_str().unwrap_or_default();
    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    let me: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(me["email"], email);
    assert!(me.get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({"email": "nobody@library.org", "password": "wrong-password"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_reader_email() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let reader = create_reader(&client, &token).await;

    let response = client
        .post(format!("{}/readers", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"name": "Copycat", "email": reader["email"]}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_book_list_is_public_and_paginated() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let newest = create_book(&client, &token, 1).await;

    let response = client
        .get(format!("{}/books?page=1&per_page=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let page: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(page["page"], 1);
    assert_eq!(page["per_page"], 5);
    assert!(page["total"].as_i64().unwrap_or_default() >= 1);
    assert_eq!(page["items"][0]["id"], newest["id"]);
}

#[tokio::test]
#[ignore]
async fn test_partial_book_update_clears_isbn() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let isbn = unique()[..13].to_string();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"title": "Solaris", "author": "Stanislaw Lem", "isbn": isbn}))
        .send()
        .await
        .expect("Failed to send request");
    let book: Value = response.json().await.expect("Failed to parse response");

    let response = client
        .put(format!("{}/books/{}", BASE_URL, book["id"]))
        .bearer_auth(&token)
        .json(&json!({"isbn": null}))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let updated: Value = response.json().await.expect("Failed to parse response");
    assert!(updated["isbn"].is_null());
    assert_eq!(updated["title"], "Solaris");
    assert_eq!(updated["copies_count"], 1);
}

#[tokio::test]
#[ignore]
async fn test_borrow_return_cycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let book = create_book(&client, &token, 1).await;
    let reader = create_reader(&client, &token).await;

    let response = borrow(&client, &token, &book, &reader).await;
    assert_eq!(response.status(), 201);
    let record: Value = response.json().await.expect("Failed to parse response");

    // Last copy is out
    let response = borrow(&client, &token, &book, &reader).await;
    assert_eq!(response.status(), 409);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, record["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, record["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let book_after: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(book_after["copies_count"], 1);

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_borrow_limit() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let reader = create_reader(&client, &token).await;

    for _ in 0..3 {
        let book = create_book(&client, &token, 1).await;
        let response = borrow(&client, &token, &book, &reader).await;
        assert_eq!(response.status(), 201);
    }

    let shelf = create_book(&client, &token, 5).await;
    let response = borrow(&client, &token, &shelf, &reader).await;
    assert_eq!(response.status(), 422);

    let response = client
        .get(format!("{}/readers/{}/borrows", BASE_URL, reader["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let held: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(held["borrowed_books"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/readers", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_of_last_copy() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let book = create_book(&client, &token, 1).await;
    let ada = create_reader(&client, &token).await;
    let grace = create_reader(&client, &token).await;

    let (first, second) = tokio::join!(
        borrow(&client, &token, &book, &ada),
        borrow(&client, &token, &book, &grace)
    );

    let mut statuses = vec![first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 409]);

    let rejected = if first.status() == 409 { first } else { second };
    let body: Value = rejected.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], 8);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let book_after: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(book_after["copies_count"], 0);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_respect_limit() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let reader = create_reader(&client, &token).await;
    let mut books = Vec::new();
    for _ in 0..4 {
        books.push(create_book(&client, &token, 1).await);
    }

    let (a, b, c, d) = tokio::join!(
        borrow(&client, &token, &books[0], &reader),
        borrow(&client, &token, &books[1], &reader),
        borrow(&client, &token, &books[2], &reader),
        borrow(&client, &token, &books[3], &reader)
    );

    let mut statuses: Vec<u16> = [a, b, c, d].iter().map(|r| r.status().as_u16()).collect();
    statuses.sort_unstable();
    assert_eq!(statuses, vec![201, 201, 201, 422]);

    let response = client
        .get(format!("{}/readers/{}/borrows", BASE_URL, reader["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let held: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(held["borrowed_books"].as_array().map(Vec::len), Some(3));
}
