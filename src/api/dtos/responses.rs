use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::domain::models::{
    event::Event,
    participant::RosterEntry,
    user::User,
    wishlist::{FormattedWishlist, Wishlist},
};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct UserProfileResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub telegram_linked: bool,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            telegram_linked: user.telegram_linked(),
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
        }
    }
}

#[derive(Serialize)]
pub struct TelegramLinkResponse {
    pub linked: bool,
    pub link: String,
}

#[derive(Serialize)]
pub struct WishlistResponse {
    #[serde(flatten)]
    pub wishlist: Wishlist,
    pub share_link: String,
}

#[derive(Serialize)]
pub struct SharedWishlistResponse {
    pub title: String,
    pub owner_name: String,
    pub content: String,
    pub formatted: FormattedWishlist,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct EventSummaryResponse {
    #[serde(flatten)]
    pub event: Event,
    pub participant_count: i64,
    pub is_creator: bool,
    pub join_link: String,
}

#[derive(Serialize)]
pub struct EventPreviewResponse {
    pub code: String,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub target_count: i32,
    pub status: String,
    pub creator_name: String,
    pub participant_count: i64,
}

#[derive(Serialize)]
pub struct AssignmentView {
    pub recipient_name: String,
    pub wishlist_text: String,
    pub formatted: FormattedWishlist,
}

#[derive(Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: Event,
    pub creator_name: String,
    pub participants: Vec<RosterEntry>,
    pub participant_count: usize,
    pub join_link: String,
    pub is_creator: bool,
    pub is_participant: bool,
    pub my_wishlist: Option<String>,
    pub my_assignment: Option<AssignmentView>,
}

#[derive(Serialize)]
pub struct ParticipationResponse {
    pub event_id: String,
    pub event_status: String,
    pub wishlist_text: String,
    pub joined_at: DateTime<Utc>,
    pub rejoined: bool,
    pub match_outcome: &'static str,
}
