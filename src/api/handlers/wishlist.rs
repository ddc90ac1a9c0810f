use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::identity::CurrentUser;
use crate::api::dtos::{
    requests::{CreateWishlistRequest, UpdateWishlistRequest},
    responses::{SharedWishlistResponse, WishlistResponse},
};
use crate::config::Config;
use crate::domain::models::wishlist::{format_wishlist_content, Wishlist};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

fn to_response(config: &Config, wishlist: Wishlist) -> WishlistResponse {
    WishlistResponse {
        share_link: config.share_link(&wishlist.share_uuid),
        wishlist,
    }
}

pub async fn list_wishlists(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let wishlists = state.wishlist_repo.list_by_user(&user.id).await?;
    let response: Vec<WishlistResponse> = wishlists
        .into_iter()
        .map(|w| to_response(&state.config, w))
        .collect();
    Ok(Json(response))
}

pub async fn create_wishlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateWishlistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Wishlist title must not be empty".into()));
    }

    let wishlist = Wishlist::new(user.id.clone(), title.to_string(), payload.content.trim().to_string());
    let created = state.wishlist_repo.create(&wishlist).await?;
    info!("Created wishlist {} for user {}", created.id, user.id);

    Ok((StatusCode::CREATED, Json(to_response(&state.config, created))))
}

pub async fn get_wishlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wishlist_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let wishlist = state.wishlist_repo.find_by_id(&user.id, &wishlist_id).await?
        .ok_or(AppError::NotFound("Wishlist not found".into()))?;
    Ok(Json(to_response(&state.config, wishlist)))
}

pub async fn update_wishlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wishlist_id): Path<String>,
    Json(payload): Json<UpdateWishlistRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut wishlist = state.wishlist_repo.find_by_id(&user.id, &wishlist_id).await?
        .ok_or(AppError::NotFound("Wishlist not found".into()))?;

    if let Some(title) = payload.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Wishlist title must not be empty".into()));
        }
        wishlist.title = title.to_string();
    }
    if let Some(content) = payload.content {
        wishlist.content = content.trim().to_string();
    }

    let updated = state.wishlist_repo.update(&wishlist).await?;
    Ok(Json(to_response(&state.config, updated)))
}

pub async fn delete_wishlist(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wishlist_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.wishlist_repo.delete(&user.id, &wishlist_id).await?;
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn get_shared_wishlist(
    State(state): State<Arc<AppState>>,
    Path(share_uuid): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let wishlist = state.wishlist_repo.find_by_share_uuid(&share_uuid).await?
        .ok_or(AppError::NotFound("Wishlist not found".into()))?;

    let owner_name = state.user_repo.find_by_id(&wishlist.user_id).await?
        .map(|u| u.name)
        .unwrap_or_default();

    Ok(Json(SharedWishlistResponse {
        formatted: format_wishlist_content(&wishlist.content),
        title: wishlist.title,
        owner_name,
        content: wishlist.content,
        created_at: wishlist.created_at,
    }))
}
