use crate::domain::ports::Notifier;
use crate::error::AppError;
use async_trait::async_trait;
use tracing::info;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AppError> {
        info!(chat_id, "Telegram disabled, message not sent:\n{}", text);
        Ok(())
    }
}
