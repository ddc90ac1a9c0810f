mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn event_creation_is_validated() {
    let app = TestApp::new().await;
    let alice = app.register("Alice").await;

    let cases = [
        json!({ "title": "  ", "target_count": 3 }),
        json!({ "title": "Party", "target_count": 1 }),
        json!({ "title": "Party", "target_count": 3, "budget": -5.0 }),
    ];
    for payload in cases {
        let (status, _) = app.request("POST", "/api/v1/events", Some(&alice.id), Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {} was accepted", payload);
    }

    let (status, body) = app.request("POST", "/api/v1/events", Some(&alice.id), Some(json!({
        "title": " Family ",
        "target_count": 2,
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Family");
    assert_eq!(body["budget"], 0.0);
    assert_eq!(body["status"], "OPEN");
    assert_eq!(body["is_creator"], true);

    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 7);
    assert_eq!(&code[3..4], "-");
    assert_eq!(body["join_link"], format!("http://santa.test/join/{}", code));
}

#[tokio::test]
async fn identity_header_is_required() {
    let app = TestApp::new().await;

    let (status, _) = app.request("GET", "/api/v1/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("GET", "/api/v1/events", Some("no-such-user"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn my_events_lists_created_and_joined() {
    let app = TestApp::new().await;
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;
    let carol = app.register("Carol").await;

    let own = app.create_event(&bob, "Bob's own", 3).await;
    let joined = app.create_event(&alice, "Alice's", 3).await;
    app.create_event(&carol, "Unrelated", 3).await;
    app.join(&bob, joined["code"].as_str().unwrap(), "Tea").await;

    let (status, body) = app.request("GET", "/api/v1/events", Some(&bob.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 2);

    // newest first
    assert_eq!(events[0]["id"], joined["id"]);
    assert_eq!(events[0]["is_creator"], false);
    assert_eq!(events[0]["participant_count"], 1);
    assert_eq!(events[1]["id"], own["id"]);
    assert_eq!(events[1]["is_creator"], true);
}

#[tokio::test]
async fn preview_shows_summary_without_identity() {
    let app = TestApp::new().await;
    let alice = app.register("Alice").await;
    let event = app.create_event(&alice, "Preview me", 5).await;
    app.join(&alice, event["code"].as_str().unwrap(), "Tea").await;

    let code = event["code"].as_str().unwrap().to_lowercase();
    let (status, body) = app.request("GET", &format!("/api/v1/invites/{}", code), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Preview me");
    assert_eq!(body["creator_name"], "Alice");
    assert_eq!(body["participant_count"], 1);
    assert_eq!(body["target_count"], 5);
    assert_eq!(body["budget"], 25.0);
}

#[tokio::test]
async fn detail_reveals_only_the_viewers_own_assignment() {
    let app = TestApp::new().await;
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;
    let carol = app.register("Carol").await;
    let dave = app.register("Dave").await;

    let event = app.create_event(&alice, "Secret", 3).await;
    let event_id = event["id"].as_str().unwrap();
    let code = event["code"].as_str().unwrap();

    let before = app.event_detail(&dave, event_id).await;
    assert!(before["my_assignment"].is_null());

    app.join(&alice, code, "Tea").await;
    app.join(&bob, code, "Coffee").await;
    app.join(&carol, code, "Cake").await;

    let detail = app.event_detail(&alice, event_id).await;
    assert_eq!(detail["creator_name"], "Alice");
    assert_eq!(detail["participant_count"], 3);
    assert_eq!(detail["is_creator"], true);
    assert_eq!(detail["is_participant"], true);

    let names: Vec<&str> = detail["participants"].as_array().unwrap().iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    for entry in detail["participants"].as_array().unwrap() {
        assert!(entry.get("santa_for_user_id").is_none());
        assert!(entry.get("wishlist_text").is_none());
    }

    let outsider = app.event_detail(&dave, event_id).await;
    assert_eq!(outsider["is_participant"], false);
    assert!(outsider["my_assignment"].is_null());
    assert!(outsider["my_wishlist"].is_null());
}

#[tokio::test]
async fn only_the_creator_can_delete() {
    let app = TestApp::new().await;
    let alice = app.register("Alice").await;
    let bob = app.register("Bob").await;

    let event = app.create_event(&alice, "Doomed", 2).await;
    let event_id = event["id"].as_str().unwrap();
    let code = event["code"].as_str().unwrap();
    app.join(&alice, code, "Tea").await;
    app.join(&bob, code, "Coffee").await;

    let uri = format!("/api/v1/events/{}", event_id);
    let (status, _) = app.request("DELETE", &uri, Some(&bob.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("GET", &format!("{}/notifications", uri), Some(&bob.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // matched events can still be removed
    let (status, body) = app.request("DELETE", &uri, Some(&alice.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");

    let (status, _) = app.request("GET", &uri, Some(&alice.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.participant_repo.count(event_id).await.unwrap(), 0);
    assert!(app.state.notification_log_repo.list_by_event(event_id).await.unwrap().is_empty());
}
