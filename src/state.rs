use std::sync::Arc;
use crate::domain::ports::{
    EventRepository, NotificationLogRepository, ParticipantRepository, UserRepository,
    WishlistRepository,
};
use crate::domain::services::{matching::MatchingService, notification_service::NotificationService};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub wishlist_repo: Arc<dyn WishlistRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub participant_repo: Arc<dyn ParticipantRepository>,
    pub notification_log_repo: Arc<dyn NotificationLogRepository>,
    pub matching_service: Arc<MatchingService>,
    pub notification_service: Arc<NotificationService>,
}
