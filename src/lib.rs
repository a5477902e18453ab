pub mod auth;
pub mod config;
pub mod core;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Test/embedding entry point: builds the full router, tolerating an absent
/// database (DB-backed routes then answer 503).
pub async fn create_app() -> axum::Router {
    let db_proxy = db::DatabaseProxy::from_env().await.ok();
    let state = AppState::new(db_proxy);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
