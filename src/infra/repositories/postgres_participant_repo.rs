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
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

const PARTICIPANT_COLUMNS: &str = "id, user_id, event_id, wishlist_text, santa_for_user_id, joined_at";

pub struct PostgresParticipantRepo {
    pool: PgPool,
}

impl PostgresParticipantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Takes a shared lock on the event row. Blocks while a matching transaction
/// holds it, then reports whether the event is still OPEN.
async fn lock_open_event(tx: &mut Transaction<'_, Postgres>, event_id: &str) -> Result<bool, AppError> {
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM events WHERE id = $1 FOR SHARE")
        .bind(event_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::Database)?;
    Ok(status.as_deref() == Some(STATUS_OPEN))
}

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepo {
    async fn join(&self, participant: &Participant) -> Result<Option<Participant>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if !lock_open_event(&mut tx, &participant.event_id).await? {
            return Ok(None);
        }

        let created = sqlx::query_as::<_, Participant>(&format!(
            "INSERT INTO participants ({PARTICIPANT_COLUMNS}) VALUES ($1, $2, $3, $4, NULL, $5) RETURNING {PARTICIPANT_COLUMNS}"
        ))
            .bind(&participant.id).bind(&participant.user_id).bind(&participant.event_id)
            .bind(&participant.wishlist_text).bind(participant.joined_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(created))
    }

    async fn find(&self, event_id: &str, user_id: &str) -> Result<Option<Participant>, AppError> {
        sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE event_id = $1 AND user_id = $2"
        ))
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn load_participants(&self, event_id: &str) -> Result<Vec<Participant>, AppError> {
        sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE event_id = $1 ORDER BY joined_at ASC, id ASC"
        ))
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_roster(&self, event_id: &str) -> Result<Vec<RosterEntry>, AppError> {
        sqlx::query_as::<_, RosterEntry>(
            "SELECT p.user_id, u.name, p.joined_at FROM participants p
             JOIN users u ON u.id = p.user_id
             WHERE p.event_id = $1
             ORDER BY p.joined_at ASC, p.id ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, event_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM participants WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_wishlist(&self, event_id: &str, user_id: &str, wishlist_text: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if !lock_open_event(&mut tx, event_id).await? {
            return Ok(false);
        }

        let result = sqlx::query("UPDATE participants SET wishlist_text = $1 WHERE event_id = $2 AND user_id = $3")
            .bind(wishlist_text)
            .bind(event_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }

    async fn leave(&self, event_id: &str, user_id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        if !lock_open_event(&mut tx, event_id).await? {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM participants WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(result.rows_affected() == 1)
    }

    async fn transition_and_assign(&self, event_id: &str, assignment: &MatchAssignment) -> Result<TransitionResult, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Row lock on the event serializes concurrent matchers and roster writers.
        let flipped = sqlx::query("UPDATE events SET status = 'MATCHED' WHERE id = $1 AND status = 'OPEN'")
            .bind(event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if flipped.rows_affected() == 0 {
            debug!("Event {} is no longer OPEN", event_id);
            return Ok(TransitionResult::StatusConflict);
        }

        let current = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM participants WHERE event_id = $1")
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
                "UPDATE participants SET santa_for_user_id = $1
                 WHERE id = $2 AND event_id = $3 AND wishlist_text = $4",
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
