pub mod sqlite_user_repo;
pub mod sqlite_wishlist_repo;
pub mod sqlite_event_repo;
pub mod sqlite_participant_repo;
pub mod sqlite_notification_log_repo;

pub mod postgres_user_repo;
pub mod postgres_wishlist_repo;
pub mod postgres_event_repo;
pub mod postgres_participant_repo;
pub mod postgres_notification_log_repo;
