use crate::domain::{models::notification::NotificationLog, ports::NotificationLogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresNotificationLogRepo {
    pool: PgPool,
}

impl PostgresNotificationLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationLogRepository for PostgresNotificationLogRepo {
    async fn log(&self, entry: &NotificationLog) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO notification_logs (id, event_id, user_id, kind, status, error_message, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
            .bind(&entry.id).bind(&entry.event_id).bind(&entry.user_id).bind(&entry.kind)
            .bind(&entry.status).bind(&entry.error_message).bind(entry.created_at)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<NotificationLog>, AppError> {
        sqlx::query_as::<_, NotificationLog>(
            "SELECT id, event_id, user_id, kind, status, error_message, created_at
             FROM notification_logs WHERE event_id = $1 ORDER BY created_at ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
