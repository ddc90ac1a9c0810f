use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use tracing::{Span, warn};

pub const USER_ID_HEADER: &str = "X-User-Id";

pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts.headers.get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let user = app_state.user_repo.find_by_id(&user_id).await?
            .ok_or_else(|| {
                warn!("Request for unknown user {}", user_id);
                AppError::Unauthorized
            })?;

        Span::current().record("user_id", user.id.as_str());

        Ok(CurrentUser(user))
    }
}
