use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, user, wishlist, event, participant};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Users & Telegram linking
        .route("/api/v1/users", post(user::register_user))
        .route("/api/v1/me", get(user::get_profile))
        .route("/api/v1/me/telegram", get(user::get_telegram_link))
        .route("/api/v1/telegram/link", post(user::link_telegram))

        // Wishlists
        .route("/api/v1/wishlists", get(wishlist::list_wishlists).post(wishlist::create_wishlist))
        .route("/api/v1/wishlists/{wishlist_id}", get(wishlist::get_wishlist).put(wishlist::update_wishlist).delete(wishlist::delete_wishlist))
        .route("/api/v1/shared/wishlists/{share_uuid}", get(wishlist::get_shared_wishlist))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_my_events))
        .route("/api/v1/events/{event_id}", get(event::get_event_detail).delete(event::delete_event))
        .route("/api/v1/events/{event_id}/notifications", get(event::list_notifications))

        // Participation
        .route("/api/v1/invites/{code}", get(event::preview_by_code))
        .route("/api/v1/invites/{code}/join", post(participant::join_event))
        .route("/api/v1/events/{event_id}/wishlist", put(participant::update_event_wishlist))
        .route("/api/v1/events/{event_id}/leave", post(participant::leave_event))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
