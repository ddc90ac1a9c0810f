use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::identity::CurrentUser;
use crate::api::dtos::{
    requests::CreateEventRequest,
    responses::{AssignmentView, EventDetailResponse, EventPreviewResponse, EventSummaryResponse},
};
use crate::domain::models::{
    event::{normalize_invite_code, Event},
    participant::Participant,
    wishlist::format_wishlist_content,
};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

const MAX_CODE_ATTEMPTS: usize = 10;

pub(crate) async fn find_event_by_code(state: &AppState, raw_code: &str) -> Result<Event, AppError> {
    let code = normalize_invite_code(raw_code)
        .ok_or(AppError::NotFound("Event not found".into()))?;
    state.event_repo.find_by_code(&code).await?
        .ok_or(AppError::NotFound("Event not found".into()))
}

pub(crate) async fn find_event(state: &AppState, event_id: &str) -> Result<Event, AppError> {
    state.event_repo.find_by_id(event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))
}

async fn user_name(state: &AppState, user_id: &str) -> Result<String, AppError> {
    Ok(state.user_repo.find_by_id(user_id).await?
        .map(|u| u.name)
        .unwrap_or_else(|| "Unknown".to_string()))
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Event title must not be empty".into()));
    }
    let budget = payload.budget.unwrap_or(0.0);
    if !budget.is_finite() || budget < 0.0 {
        return Err(AppError::Validation("Budget must be zero or positive".into()));
    }
    if payload.target_count < 2 {
        return Err(AppError::Validation("An event needs at least 2 participants".into()));
    }

    let description = payload.description.unwrap_or_default().trim().to_string();

    for _ in 0..MAX_CODE_ATTEMPTS {
        let event = Event::new(user.id.clone(), title.to_string(), description.clone(), budget, payload.target_count);
        if state.event_repo.find_by_code(&event.code).await?.is_some() {
            warn!("Invite code {} already taken, regenerating", event.code);
            continue;
        }

        let created = state.event_repo.create(&event).await?;
        info!("Created event {} ({}) with target {}", created.id, created.code, created.target_count);

        return Ok((StatusCode::CREATED, Json(EventSummaryResponse {
            join_link: state.config.join_link(&created.code),
            event: created,
            participant_count: 0,
            is_creator: true,
        })));
    }

    Err(AppError::InternalWithMsg("Could not generate a unique invite code".into()))
}

pub async fn list_my_events(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_for_user(&user.id).await?;

    let mut response = Vec::with_capacity(events.len());
    for event in events {
        let participant_count = state.participant_repo.count(&event.id).await?;
        response.push(EventSummaryResponse {
            join_link: state.config.join_link(&event.code),
            is_creator: event.creator_id == user.id,
            participant_count,
            event,
        });
    }

    Ok(Json(response))
}

pub async fn preview_by_code(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event_by_code(&state, &code).await?;
    let creator_name = user_name(&state, &event.creator_id).await?;
    let participant_count = state.participant_repo.count(&event.id).await?;

    Ok(Json(EventPreviewResponse {
        code: event.code,
        title: event.title,
        description: event.description,
        budget: event.budget,
        target_count: event.target_count,
        status: event.status,
        creator_name,
        participant_count,
    }))
}

pub async fn get_event_detail(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event(&state, &event_id).await?;
    let creator_name = user_name(&state, &event.creator_id).await?;
    let participants = state.participant_repo.list_roster(&event.id).await?;
    let me = state.participant_repo.find(&event.id, &user.id).await?;

    let my_assignment = match &me {
        Some(Participant { santa_for_user_id: Some(recipient_id), .. }) if !event.is_open() => {
            let recipient = state.participant_repo.find(&event.id, recipient_id).await?;
            match recipient {
                Some(recipient) => Some(AssignmentView {
                    recipient_name: user_name(&state, recipient_id).await?,
                    formatted: format_wishlist_content(&recipient.wishlist_text),
                    wishlist_text: recipient.wishlist_text,
                }),
                None => None,
            }
        }
        _ => None,
    };

    Ok(Json(EventDetailResponse {
        creator_name,
        participant_count: participants.len(),
        participants,
        join_link: state.config.join_link(&event.code),
        is_creator: event.creator_id == user.id,
        is_participant: me.is_some(),
        my_wishlist: me.map(|p| p.wishlist_text),
        my_assignment,
        event,
    }))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event(&state, &event_id).await?;
    if event.creator_id != user.id {
        return Err(AppError::Forbidden("Only the creator can delete this event".into()));
    }

    state.event_repo.delete(&event.id).await?;
    info!("Deleted event {} ({})", event.id, event.code);

    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_event(&state, &event_id).await?;
    if event.creator_id != user.id {
        return Err(AppError::Forbidden("Only the creator can view notifications".into()));
    }

    let logs = state.notification_log_repo.list_by_event(&event.id).await?;
    Ok(Json(logs))
}
