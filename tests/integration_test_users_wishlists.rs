mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn health_check_is_ok() {
    let app = TestApp::new().await;
    let (status, body) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn registration_is_an_upsert_by_google_id() {
    let app = TestApp::new().await;
    let payload = json!({ "google_id": "g-1", "email": "ann@example.com", "name": "Ann" });

    let (status, first) = app.request("POST", "/api/v1/users", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(first.get("connect_token").is_none());
    assert!(first.get("google_id").is_none());

    let (status, second) = app.request("POST", "/api/v1/users", None, Some(json!({
        "google_id": "g-1",
        "email": "ann@example.com",
        "name": "Ann Smith",
        "avatar": "https://img.example.com/ann.png",
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert!(second.get("connect_token").is_none());
    assert_eq!(second["name"], "Ann Smith");
    assert_eq!(second["avatar"], "https://img.example.com/ann.png");

    let stored = app.state.user_repo.find_by_google_id("g-1").await.unwrap().unwrap();
    let first_token = stored.connect_token.clone();
    assert_eq!(stored.name, "Ann Smith");

    app.request("POST", "/api/v1/users", None, Some(json!({
        "google_id": "g-1", "email": "ann@example.com", "name": "Ann",
    }))).await;
    let stored = app.state.user_repo.find_by_google_id("g-1").await.unwrap().unwrap();
    assert_eq!(stored.connect_token, first_token);

    let (status, _) = app.request("POST", "/api/v1/users", None, Some(json!({
        "google_id": "g-2", "email": "ann@example.com", "name": "Impostor",
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.request("POST", "/api/v1/users", None, Some(json!({
        "google_id": "", "email": "x@example.com", "name": "X",
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn telegram_linking_flow() {
    let app = TestApp::new().await;
    let ann = app.register("Ann").await;

    let (status, link) = app.request("GET", "/api/v1/me/telegram", Some(&ann.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(link["linked"], false);
    assert_eq!(link["link"], format!("https://t.me/TestSantaBot?start={}", ann.connect_token));

    let (status, _) = app.request("POST", "/api/v1/telegram/link", None, Some(json!({
        "connect_token": "not-a-token",
        "chat_id": 42,
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, profile) = app.request("POST", "/api/v1/telegram/link", None, Some(json!({
        "connect_token": ann.connect_token,
        "chat_id": 42,
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["telegram_linked"], true);

    let (_, me) = app.request("GET", "/api/v1/me", Some(&ann.id), None).await;
    assert_eq!(me["telegram_linked"], true);
    assert_eq!(me["name"], "Ann");
    assert!(me.get("connect_token").is_none());

    let stored = app.state.user_repo.find_by_id(&ann.id).await.unwrap().unwrap();
    assert_eq!(stored.telegram_chat_id, Some(42));
}

#[tokio::test]
async fn wishlists_belong_to_their_owner() {
    let app = TestApp::new().await;
    let ann = app.register("Ann").await;
    let ben = app.register("Ben").await;

    let (status, first) = app.request("POST", "/api/v1/wishlists", Some(&ann.id), Some(json!({
        "title": "Birthday", "content": "Books",
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = app.request("POST", "/api/v1/wishlists", Some(&ann.id), Some(json!({
        "title": "Christmas", "content": "1. Lego\n2. Puzzle",
    }))).await;

    let (_, list) = app.request("GET", "/api/v1/wishlists", Some(&ann.id), None).await;
    let titles: Vec<&str> = list.as_array().unwrap().iter().map(|w| w["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Christmas", "Birthday"]);

    let uri = format!("/api/v1/wishlists/{}", first["id"].as_str().unwrap());
    let (status, _) = app.request("GET", &uri, Some(&ben.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.request("PUT", &uri, Some(&ben.id), Some(json!({ "content": "Hacked" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.request("DELETE", &uri, Some(&ben.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = app.request("PUT", &uri, Some(&ann.id), Some(json!({ "title": "Birthday 2026" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Birthday 2026");
    assert_eq!(updated["content"], "Books");

    let (status, _) = app.request("DELETE", &uri, Some(&ann.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.request("GET", &uri, Some(&ann.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, ben_list) = app.request("GET", "/api/v1/wishlists", Some(&ben.id), None).await;
    assert!(ben_list.as_array().unwrap().is_empty());
    assert!(second["share_link"].as_str().unwrap().starts_with("http://santa.test/share/"));
}

#[tokio::test]
async fn shared_wishlist_is_public_and_formatted() {
    let app = TestApp::new().await;
    let ann = app.register("Ann").await;

    let (_, wishlist) = app.request("POST", "/api/v1/wishlists", Some(&ann.id), Some(json!({
        "title": "Christmas", "content": "1. Lego\n2. Puzzle",
    }))).await;
    let share_uuid = wishlist["share_uuid"].as_str().unwrap();

    let (status, shared) = app.request("GET", &format!("/api/v1/shared/wishlists/{}", share_uuid), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shared["owner_name"], "Ann");
    assert_eq!(shared["formatted"]["is_list"], true);
    assert_eq!(shared["formatted"]["items"], json!(["Lego", "Puzzle"]));
    assert!(shared.get("user_id").is_none());

    let (status, _) = app.request("GET", "/api/v1/shared/wishlists/unknown", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
