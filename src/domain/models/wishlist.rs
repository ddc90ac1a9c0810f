use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Wishlist {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub share_uuid: String,
    pub created_at: DateTime<Utc>,
}

impl Wishlist {
    pub fn new(user_id: String, title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            title,
            content,
            share_uuid: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct FormattedWishlist {
    pub is_list: bool,
    pub items: Vec<String>,
}

pub fn format_wishlist_content(content: &str) -> FormattedWishlist {
    let lines: Vec<&str> = content
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return FormattedWishlist { is_list: false, items: Vec::new() };
    }

    let mut items = Vec::with_capacity(lines.len());
    let mut is_list = false;

    for line in lines {
        match numbered_item(line) {
            Some(item) => {
                is_list = true;
                items.push(item.to_string());
            }
            // continuation line of an already detected list
            None if is_list => items.push(line.to_string()),
            None => return FormattedWishlist { is_list: false, items: vec![content.to_string()] },
        }
    }

    FormattedWishlist { is_list, items }
}

fn numbered_item(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return None;
    }
    let item = rest.strip_prefix('.')?.trim();
    (!item.is_empty()).then_some(item)
}
