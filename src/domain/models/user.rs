use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub telegram_chat_id: Option<i64>,
    pub connect_token: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(google_id: String, email: String, name: String, avatar: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            google_id,
            email,
            name,
            avatar,
            telegram_chat_id: None,
            connect_token: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn telegram_linked(&self) -> bool {
        self.telegram_chat_id.is_some()
    }
}
