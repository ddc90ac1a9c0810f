use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Participant {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub wishlist_text: String,
    pub santa_for_user_id: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(user_id: String, event_id: String, wishlist_text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            event_id,
            wishlist_text,
            santa_for_user_id: None,
            joined_at: Utc::now(),
        }
    }

    pub fn has_wishlist(&self) -> bool {
        !self.wishlist_text.trim().is_empty()
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct RosterEntry {
    pub user_id: String,
    pub name: String,
    pub joined_at: DateTime<Utc>,
}
