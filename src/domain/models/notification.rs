use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const KIND_MATCH: &str = "MATCH";
pub const KIND_JOIN: &str = "JOIN";
pub const KIND_LEAVE: &str = "LEAVE";

pub const STATUS_SENT: &str = "SENT";
pub const STATUS_FAILED: &str = "FAILED";
pub const STATUS_SKIPPED_UNLINKED: &str = "SKIPPED_UNLINKED";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct NotificationLog {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub kind: String,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NotificationLog {
    pub fn new(event_id: &str, user_id: &str, kind: &str, status: &str, error_message: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id: event_id.to_string(),
            user_id: user_id.to_string(),
            kind: kind.to_string(),
            status: status.to_string(),
            error_message,
            created_at: Utc::now(),
        }
    }
}
