mod auth;
mod chat;
mod domains;
mod health;
mod progress;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/me", get(auth::me))
        .route(
            "/api/v1/auth/children",
            get(auth::list_children).post(auth::create_child),
        )
        .route(
            "/api/v1/domains",
            get(domains::list_domains).post(domains::create_domain),
        )
        .route("/api/v1/domains/:domainId", get(domains::get_domain))
        .route(
            "/api/v1/domains/:domainId/words",
            get(domains::list_words).post(domains::create_word),
        )
        .route("/api/v1/domains/:domainId/graph", get(domains::domain_graph))
        .route(
            "/api/v1/progress/child/:childId",
            get(progress::get_child_progress),
        )
        .route(
            "/api/v1/progress/child/:childId/overview",
            get(progress::overview),
        )
        .route(
            "/api/v1/progress/child/:childId/next-words",
            get(progress::next_words),
        )
        .route(
            "/api/v1/progress/child/:childId/word/:wordId/attempt",
            post(progress::record_attempt),
        )
        .route("/api/v1/chat/message", post(chat::send_message))
        .route(
            "/api/v1/chat/sessions/:sessionId/history",
            get(chat::history),
        )
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found").into_response()
}
