use crate::domain::{
    models::{
        event::STATUS_OPEN,
        matching::{MatchAssignment, TransitionResult},
        participant::{Participant, RosterEntry},
    },
    ports::ParticipantRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

pub struct SqliteParticipantRepo {
    pool: SqlitePool,
}

impl SqliteParticipantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for SqliteParticipantRepo {
    async fn join(&self, participant: &Participant) -> Result<Option<Participant>, AppError> {
        sqlx::query_as::<_, Participant>(
            "INSERT INTO participants (id, user_id, event_id, wishlist_text, santa_for_user_id, joined_at)
             SELECT ?, ?, ?, ?, NULL, ?
             WHERE EXISTS (SELECT 1 FROM events WHERE id = ? AND status = ?)
             RETURNING *",
        )
            .bind(&participant.id).bind(&participant.user_id).bind(&participant.event_id)
            .bind(&participant.wishlist_text).bind(participant.joined_at)
            .bind(&participant.event_id).bind(STATUS_OPEN)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find(&self, event_id: &str, user_id: &str) -> Result<Option<Participant>, AppError> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE event_id = ? AND user_id = ?")
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn load_participants(&self, event_id: &str) -> Result<Vec<Participant>, AppError> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE event_id = ? ORDER BY joined_at ASC, id ASC")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_roster(&self, event_id: &str) -> Result<Vec<RosterEntry>, AppError> {
        sqlx::query_as::<_, RosterEntry>(
            "SELECT p.user_id, u.name, p.joined_at FROM participants p
             JOIN users u ON u.id = p.user_id
             WHERE p.event_id = ?
             ORDER BY p.joined_at ASC, p.id ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, event_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM participants WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_wishlist(&self, event_id: &str, user_id: &str, wishlist_text: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE participants SET wishlist_text = ?
             WHERE event_id = ? AND user_id = ?
               AND EXISTS (SELECT 1 FROM events WHERE id = ? AND status = ?)",
        )
            .bind(wishlist_text).bind(event_id).bind(user_id).bind(event_id).bind(STATUS_OPEN)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }

    async fn leave(&self, event_id: &str, user_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM participants
             WHERE event_id = ? AND user_id = ?
               AND EXISTS (SELECT 1 FROM events WHERE id = ? AND status = ?)",
        )
            .bind(event_id).bind(user_id).bind(event_id).bind(STATUS_OPEN)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }

    async fn transition_and_assign(&self, event_id: &str, assignment: &MatchAssignment) -> Result<TransitionResult, AppError> {
        // The status flip is the first statement, so the write lock is taken up front.
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let flipped = sqlx::query("UPDATE events SET status = 'MATCHED' WHERE id = ? AND status = 'OPEN'")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if flipped.rows_affected() == 0 {
            debug!("Event {} is no longer OPEN", event_id);
            return Ok(TransitionResult::StatusConflict);
        }

        let current = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM participants WHERE event_id = ?")
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if current != assignment.len() as i64 {
            debug!("Event {} roster moved from {} to {} participants", event_id, assignment.len(), current);
            return Ok(TransitionResult::StaleParticipants);
        }

        for pair in &assignment.pairs {
            let updated = sqlx::query(
                "UPDATE participants SET santa_for_user_id = ?
                 WHERE id = ? AND event_id = ? AND wishlist_text = ?",
            )
                .bind(&pair.recipient.user_id).bind(&pair.giver.id).bind(event_id).bind(&pair.giver.wishlist_text)
                .execute(&mut *tx)
                .await
                .map_err(AppError::Database)?;
            if updated.rows_affected() != 1 {
                debug!("Participant {} changed during matching", pair.giver.id);
                return Ok(TransitionResult::StaleParticipants);
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(TransitionResult::Committed)
    }
}
