use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::Rng;

pub const STATUS_OPEN: &str = "OPEN";
pub const STATUS_MATCHED: &str = "MATCHED";

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub code: String,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub target_count: i32,
    pub status: String, // OPEN, MATCHED
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(creator_id: String, title: String, description: String, budget: f64, target_count: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: generate_invite_code(),
            title,
            description,
            budget,
            target_count,
            status: STATUS_OPEN.to_string(),
            creator_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == STATUS_OPEN
    }
}

pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    let raw: String = (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", &raw[..3], &raw[3..])
}

/// Canonical `XXX-XXX` form of user-typed input. Case, surrounding
/// whitespace and the dash are optional.
pub fn normalize_invite_code(input: &str) -> Option<String> {
    let raw: String = input
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if raw.len() != CODE_LEN || !raw.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        return None;
    }
    Some(format!("{}-{}", &raw[..3], &raw[3..]))
}
