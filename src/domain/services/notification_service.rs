use std::collections::HashMap;
use std::sync::Arc;
use serde_json::Value;
use tera::{Context, Tera};
use tracing::{error, info, warn};

use crate::domain::models::{
    event::Event,
    matching::MatchAssignment,
    notification::{
        NotificationLog, KIND_JOIN, KIND_LEAVE, KIND_MATCH, STATUS_FAILED, STATUS_SENT,
        STATUS_SKIPPED_UNLINKED,
    },
    participant::Participant,
    user::User,
};
use crate::domain::ports::{NotificationLogRepository, Notifier, UserRepository};
use crate::error::AppError;

const MATCH_TEMPLATE: &str = "match_alert.md";
const ROSTER_TEMPLATE: &str = "roster_update.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterChange {
    Joined,
    Left,
}

impl RosterChange {
    fn kind(self) -> &'static str {
        match self {
            RosterChange::Joined => KIND_JOIN,
            RosterChange::Left => KIND_LEAVE,
        }
    }
}

/// Telegram "Markdown" (v1) treats these as formatting characters.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn md_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(Value::String(escape_markdown(&text)))
}

pub fn load_message_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::default();
    tera.register_filter("md", md_filter);
    tera.add_raw_templates(vec![
        (MATCH_TEMPLATE, include_str!("../../templates/match_alert.md")),
        (ROSTER_TEMPLATE, include_str!("../../templates/roster_update.md")),
    ])
    .map_err(|e| AppError::InternalWithMsg(format!("Failed to load message templates: {:?}", e)))?;
    Ok(tera)
}

pub struct NotificationService {
    user_repo: Arc<dyn UserRepository>,
    log_repo: Arc<dyn NotificationLogRepository>,
    notifier: Arc<dyn Notifier>,
    templates: Arc<Tera>,
}

impl NotificationService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        log_repo: Arc<dyn NotificationLogRepository>,
        notifier: Arc<dyn Notifier>,
        templates: Arc<Tera>,
    ) -> Self {
        Self { user_repo, log_repo, notifier, templates }
    }

    /// Must be called once per matched event. Returns the number of messages delivered.
    pub async fn dispatch_match(&self, event: &Event, assignment: &MatchAssignment) -> usize {
        info!("Dispatching match notifications for event {} ({} participants)", event.id, assignment.len());

        let mut delivered = 0;
        for pair in &assignment.pairs {
            let recipient_name = match self.user_repo.find_by_id(&pair.recipient.user_id).await {
                Ok(Some(user)) => user.name,
                Ok(None) => {
                    warn!("Recipient user {} missing, using placeholder name", pair.recipient.user_id);
                    "your giftee".to_string()
                }
                Err(e) => {
                    error!("Failed to load recipient {}: {:?}", pair.recipient.user_id, e);
                    self.record(event, &pair.giver.user_id, KIND_MATCH, STATUS_FAILED, Some(e.to_string())).await;
                    continue;
                }
            };

            if self.notify_match(event, &pair.giver, &recipient_name, &pair.recipient.wishlist_text).await {
                delivered += 1;
            }
        }

        info!("Match notifications for event {}: {}/{} delivered", event.id, delivered, assignment.len());
        delivered
    }

    pub async fn notify_match(
        &self,
        event: &Event,
        giver: &Participant,
        recipient_name: &str,
        recipient_wishlist_text: &str,
    ) -> bool {
        let Some(user) = self.load_user(event, &giver.user_id, KIND_MATCH).await else {
            return false;
        };

        let mut context = Context::new();
        context.insert("recipient_name", recipient_name);
        context.insert("event_title", &event.title);
        context.insert("budget", &format_budget(event.budget));
        let wishlist = if recipient_wishlist_text.trim().is_empty() {
            "No wishlist provided."
        } else {
            recipient_wishlist_text
        };
        context.insert("wishlist", wishlist);

        self.render_and_deliver(event, &user, KIND_MATCH, MATCH_TEMPLATE, &context).await
    }

    pub async fn notify_roster_change(
        &self,
        event: &Event,
        participant_name: &str,
        change: RosterChange,
        participant_count: i64,
    ) -> bool {
        let Some(creator) = self.load_user(event, &event.creator_id, change.kind()).await else {
            return false;
        };

        let mut context = Context::new();
        context.insert("joined", &(change == RosterChange::Joined));
        context.insert("participant_name", participant_name);
        context.insert("event_title", &event.title);
        context.insert("count", &participant_count);
        context.insert("target", &event.target_count);

        self.render_and_deliver(event, &creator, change.kind(), ROSTER_TEMPLATE, &context).await
    }

    async fn load_user(&self, event: &Event, user_id: &str, kind: &str) -> Option<User> {
        match self.user_repo.find_by_id(user_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                warn!("Notification target {} not found", user_id);
                self.record(event, user_id, kind, STATUS_FAILED, Some("user not found".into())).await;
                None
            }
            Err(e) => {
                error!("Failed to load notification target {}: {:?}", user_id, e);
                self.record(event, user_id, kind, STATUS_FAILED, Some(e.to_string())).await;
                None
            }
        }
    }

    async fn render_and_deliver(&self, event: &Event, user: &User, kind: &str, template: &str, context: &Context) -> bool {
        let Some(chat_id) = user.telegram_chat_id else {
            info!("User {} has no linked Telegram chat, skipping {} notification", user.id, kind);
            self.record(event, &user.id, kind, STATUS_SKIPPED_UNLINKED, None).await;
            return false;
        };

        let text = match self.templates.render(template, context) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to render {}: {:?}", template, e);
                self.record(event, &user.id, kind, STATUS_FAILED, Some(format!("render error: {}", e))).await;
                return false;
            }
        };

        match self.notifier.send_message(chat_id, &text).await {
            Ok(()) => {
                self.record(event, &user.id, kind, STATUS_SENT, None).await;
                true
            }
            Err(e) => {
                error!("Error sending {} notification to user {}: {}", kind, user.id, e);
                self.record(event, &user.id, kind, STATUS_FAILED, Some(e.to_string())).await;
                false
            }
        }
    }

    async fn record(&self, event: &Event, user_id: &str, kind: &str, status: &str, error_message: Option<String>) {
        let entry = NotificationLog::new(&event.id, user_id, kind, status, error_message);
        if let Err(e) = self.log_repo.log(&entry).await {
            warn!("Failed to record notification log for user {}: {:?}", user_id, e);
        }
    }
}

fn format_budget(budget: f64) -> String {
    if budget > 0.0 {
        format!("{:.2}", budget)
    } else {
        String::new()
    }
}
