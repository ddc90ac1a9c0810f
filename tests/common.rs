#![allow(dead_code)]

use santa_backend::{
    api::router::create_router,
    config::Config,
    domain::ports::Notifier,
    error::AppError,
    infra::factory::{assemble_state, Repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Captures outgoing chat messages. Chats listed in `failing` return an error.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentMessage>>,
    pub failing: Mutex<HashSet<i64>>,
}

impl RecordingNotifier {
    pub fn messages_to(&self, chat_id: i64) -> Vec<String> {
        self.sent.lock().unwrap().iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn match_alerts(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().iter()
            .filter(|m| m.text.contains("Match Alert"))
            .cloned()
            .collect()
    }

    pub fn fail_for(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AppError> {
        if self.failing.lock().unwrap().contains(&chat_id) {
            return Err(AppError::InternalWithMsg("chat not found".into()));
        }
        self.sent.lock().unwrap().push(SentMessage { chat_id, text: text.to_string() });
        Ok(())
    }
}

pub struct TestUser {
    pub id: String,
    pub name: String,
    pub connect_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            public_base_url: "http://santa.test".to_string(),
            telegram_bot_token: None,
            telegram_bot_username: "TestSantaBot".to_string(),
            telegram_api_url: "http://localhost".to_string(),
            match_max_attempts: 3,
        };

        let notifier = Arc::new(RecordingNotifier::default());
        let state = Arc::new(assemble_state(&config, Repositories::sqlite(pool.clone()), notifier.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            notifier,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, user_id: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header("X-User-Id", user_id);
        }
        let body = match body {
            Some(payload) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(payload.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    pub async fn register(&self, name: &str) -> TestUser {
        let unique = Uuid::new_v4();
        let (status, body) = self.request("POST", "/api/v1/users", None, Some(json!({
            "google_id": format!("google-{}", unique),
            "email": format!("{}-{}@example.com", name.to_lowercase(), unique),
            "name": name,
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, link) = self.request("GET", "/api/v1/me/telegram", Some(&id), None).await;
        assert_eq!(status, StatusCode::OK, "telegram link failed: {}", link);
        let connect_token = link["link"].as_str().unwrap().rsplit("start=").next().unwrap().to_string();

        TestUser {
            id,
            name: name.to_string(),
            connect_token,
        }
    }

    /// Registers a user and links a Telegram chat for them.
    pub async fn register_linked(&self, name: &str, chat_id: i64) -> TestUser {
        let user = self.register(name).await;
        let (status, body) = self.request("POST", "/api/v1/telegram/link", None, Some(json!({
            "connect_token": user.connect_token,
            "chat_id": chat_id,
        }))).await;
        assert_eq!(status, StatusCode::OK, "link failed: {}", body);
        user
    }

    pub async fn create_event(&self, creator: &TestUser, title: &str, target_count: i32) -> Value {
        let (status, body) = self.request("POST", "/api/v1/events", Some(&creator.id), Some(json!({
            "title": title,
            "description": "Gifts under the tree",
            "budget": 25.0,
            "target_count": target_count,
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "create event failed: {}", body);
        body
    }

    pub async fn join(&self, user: &TestUser, code: &str, wishlist: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            &format!("/api/v1/invites/{}/join", code),
            Some(&user.id),
            Some(json!({ "custom_wishlist": wishlist })),
        ).await
    }

    pub async fn event_detail(&self, user: &TestUser, event_id: &str) -> Value {
        let (status, body) = self.request("GET", &format!("/api/v1/events/{}", event_id), Some(&user.id), None).await;
        assert_eq!(status, StatusCode::OK, "event detail failed: {}", body);
        body
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
