use crate::domain::models::{
    user::User, wishlist::Wishlist, event::Event,
    participant::{Participant, RosterEntry},
    matching::{MatchAssignment, TransitionResult},
    notification::NotificationLog,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_connect_token(&self, token: &str) -> Result<Option<User>, AppError>;
    async fn update_profile(&self, user: &User) -> Result<User, AppError>;
    async fn set_telegram_chat(&self, id: &str, chat_id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait WishlistRepository: Send + Sync {
    async fn create(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError>;
    async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<Wishlist>, AppError>;
    async fn find_by_share_uuid(&self, share_uuid: &str) -> Result<Option<Wishlist>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Wishlist>, AppError>;
    async fn update(&self, wishlist: &Wishlist) -> Result<Wishlist, AppError>;
    async fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Event>, AppError>;
    /// Events the user created or joined, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Event>, AppError>;
    /// Removes the event together with its participants.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Store side of the matching engine. Every roster mutation is conditional
/// on the event still being OPEN.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Returns `None` when the event is missing or no longer OPEN.
    async fn join(&self, participant: &Participant) -> Result<Option<Participant>, AppError>;
    async fn find(&self, event_id: &str, user_id: &str) -> Result<Option<Participant>, AppError>;
    /// Participants in join order.
    async fn load_participants(&self, event_id: &str) -> Result<Vec<Participant>, AppError>;
    async fn list_roster(&self, event_id: &str) -> Result<Vec<RosterEntry>, AppError>;
    async fn count(&self, event_id: &str) -> Result<i64, AppError>;
    /// `false` when the user is not a participant or the event is MATCHED.
    async fn update_wishlist(&self, event_id: &str, user_id: &str, wishlist_text: &str) -> Result<bool, AppError>;
    /// `false` when the user is not a participant or the event is MATCHED.
    async fn leave(&self, event_id: &str, user_id: &str) -> Result<bool, AppError>;
    /// Flips the event OPEN -> MATCHED and records every assignment in one
    /// transaction. Nothing is written unless the result is `Committed`.
    async fn transition_and_assign(&self, event_id: &str, assignment: &MatchAssignment) -> Result<TransitionResult, AppError>;
}

#[async_trait]
pub trait NotificationLogRepository: Send + Sync {
    async fn log(&self, entry: &NotificationLog) -> Result<(), AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<NotificationLog>, AppError>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AppError>;
}
