use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::identity::CurrentUser;
use crate::api::handlers::event::{find_event, find_event_by_code};
use crate::api::dtos::{requests::WishlistChoice, responses::ParticipationResponse};
use crate::domain::models::{
    event::{Event, STATUS_MATCHED, STATUS_OPEN},
    participant::Participant,
    user::User,
};
use crate::domain::services::{matching::MatchOutcome, notification_service::RosterChange};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, debug};

async fn resolve_wishlist_text(state: &AppState, user: &User, choice: WishlistChoice) -> Result<String, AppError> {
    let text = match (choice.wishlist_id, choice.custom_wishlist) {
        (Some(wishlist_id), _) => {
            state.wishlist_repo.find_by_id(&user.id, &wishlist_id).await?
                .ok_or(AppError::NotFound("Wishlist not found".into()))?
                .content
        }
        (None, Some(custom)) => custom,
        (None, None) => String::new(),
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("A non-empty wishlist is required to take part".into()));
    }
    Ok(text.to_string())
}

// Only the caller that committed the match sees `Matched`, so notifications go out once.
pub async fn evaluate_and_notify(state: &AppState, event: &Event) -> Result<MatchOutcome, AppError> {
    let outcome = state.matching_service.evaluate_and_maybe_match(&event.id).await?;

    match &outcome {
        MatchOutcome::Matched(assignment) => {
            state.notification_service.dispatch_match(event, assignment).await;
        }
        other => debug!("Match evaluation for event {}: {}", event.id, other.label()),
    }
    Ok(outcome)
}

fn status_after(outcome: &MatchOutcome) -> &'static str {
    match outcome {
        MatchOutcome::NotEligible(_) => STATUS_OPEN,
        MatchOutcome::Matched(_) | MatchOutcome::AlreadyMatched | MatchOutcome::LostRace => STATUS_MATCHED,
    }
}

fn participation_response(participant: Participant, rejoined: bool, outcome: &MatchOutcome) -> ParticipationResponse {
    ParticipationResponse {
        event_id: participant.event_id,
        event_status: status_after(outcome).to_string(),
        wishlist_text: participant.wishlist_text,
        joined_at: participant.joined_at,
        rejoined,
        match_outcome: outcome.label(),
    }
}

pub async fn join_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(code): Path<String>,
    Json(choice): Json<WishlistChoice>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event_by_code(&state, &code).await?;
    let wishlist_text = resolve_wishlist_text(&state, &user, choice).await?;

    if !event.is_open() {
        return Err(AppError::Conflict("Event is already matched".into()));
    }

    let (participant, rejoined) = match state.participant_repo.find(&event.id, &user.id).await? {
        Some(existing) => {
            if !state.participant_repo.update_wishlist(&event.id, &user.id, &wishlist_text).await? {
                return Err(AppError::Conflict("Event is already matched".into()));
            }
            info!("User {} re-joined event {}, wishlist replaced", user.id, event.id);
            (Participant { wishlist_text, ..existing }, true)
        }
        None => {
            let participant = Participant::new(user.id.clone(), event.id.clone(), wishlist_text);
            let joined = state.participant_repo.join(&participant).await?
                .ok_or(AppError::Conflict("Event is already matched".into()))?;
            info!("User {} joined event {}", user.id, event.id);

            if event.creator_id != user.id {
                let count = state.participant_repo.count(&event.id).await?;
                state.notification_service
                    .notify_roster_change(&event, &user.name, RosterChange::Joined, count)
                    .await;
            }
            (joined, false)
        }
    };

    let outcome = evaluate_and_notify(&state, &event).await?;
    Ok(Json(participation_response(participant, rejoined, &outcome)))
}

pub async fn update_event_wishlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
    Json(choice): Json<WishlistChoice>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event(&state, &event_id).await?;
    let existing = state.participant_repo.find(&event.id, &user.id).await?
        .ok_or(AppError::NotFound("You are not a participant of this event".into()))?;
    let wishlist_text = resolve_wishlist_text(&state, &user, choice).await?;

    if !event.is_open() || !state.participant_repo.update_wishlist(&event.id, &user.id, &wishlist_text).await? {
        return Err(AppError::Conflict("Wishlist is frozen once the event is matched".into()));
    }
    info!("User {} updated wishlist for event {}", user.id, event.id);

    let outcome = evaluate_and_notify(&state, &event).await?;
    Ok(Json(participation_response(Participant { wishlist_text, ..existing }, false, &outcome)))
}

pub async fn leave_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event(&state, &event_id).await?;
    if state.participant_repo.find(&event.id, &user.id).await?.is_none() {
        return Err(AppError::NotFound("You are not a participant of this event".into()));
    }

    if !event.is_open() || !state.participant_repo.leave(&event.id, &user.id).await? {
        return Err(AppError::Conflict("Cannot leave an event that is already matched".into()));
    }
    info!("User {} left event {}", user.id, event.id);

    if event.creator_id != user.id {
        let count = state.participant_repo.count(&event.id).await?;
        state.notification_service
            .notify_roster_change(&event, &user.name, RosterChange::Left, count)
            .await;
    }

    // an over-full roster may have just dropped to the target
    let outcome = evaluate_and_notify(&state, &event).await?;
    Ok(Json(serde_json::json!({"status": "left", "match_outcome": outcome.label()})))
}
