use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::identity::CurrentUser;
use crate::api::dtos::{
    requests::{LinkTelegramRequest, RegisterUserRequest},
    responses::{TelegramLinkResponse, UserProfileResponse},
};
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

// Upsert hook for the OAuth proxy. The connect token stays out of the response.
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let google_id = payload.google_id.trim();
    let email = payload.email.trim();
    let name = payload.name.trim();

    if google_id.is_empty() || email.is_empty() || name.is_empty() {
        return Err(AppError::Validation("google_id, email and name are required".into()));
    }
    let avatar = payload.avatar.filter(|a| !a.trim().is_empty());

    if let Some(mut existing) = state.user_repo.find_by_google_id(google_id).await? {
        existing.email = email.to_string();
        existing.name = name.to_string();
        existing.avatar = avatar;
        let updated = state.user_repo.update_profile(&existing).await?;
        return Ok((StatusCode::OK, Json(UserProfileResponse::from(updated))));
    }

    let user = User::new(google_id.to_string(), email.to_string(), name.to_string(), avatar);
    let created = state.user_repo.create(&user).await?;
    info!("Registered user {} ({})", created.id, created.email);

    Ok((StatusCode::CREATED, Json(UserProfileResponse::from(created))))
}

pub async fn get_profile(
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(UserProfileResponse::from(user)))
}

pub async fn get_telegram_link(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(TelegramLinkResponse {
        linked: user.telegram_linked(),
        link: state.config.telegram_deep_link(&user.connect_token),
    }))
}

pub async fn link_telegram(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LinkTelegramRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_connect_token(payload.connect_token.trim()).await?
        .ok_or(AppError::NotFound("Unknown connect token".into()))?;

    state.user_repo.set_telegram_chat(&user.id, payload.chat_id).await?;
    info!("Linked Telegram chat for user {}", user.id);

    let linked = User { telegram_chat_id: Some(payload.chat_id), ..user };
    Ok(Json(UserProfileResponse::from(linked)))
}
