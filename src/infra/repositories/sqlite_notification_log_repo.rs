use crate::domain::{models::notification::NotificationLog, ports::NotificationLogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteNotificationLogRepo {
    pool: SqlitePool,
}

impl SqliteNotificationLogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationLogRepository for SqliteNotificationLogRepo {
    async fn log(&self, entry: &NotificationLog) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notification_logs (id, event_id, user_id, kind, status, error_message, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
            .bind(&entry.id).bind(&entry.event_id).bind(&entry.user_id).bind(&entry.kind)
            .bind(&entry.status).bind(&entry.error_message).bind(entry.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<NotificationLog>, AppError> {
        sqlx::query_as::<_, NotificationLog>("SELECT * FROM notification_logs WHERE event_id = ? ORDER BY created_at ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
