use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sqlx::Row;

use crate::state::AppState;

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
    status: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    uptime: u64,
}

pub async fn root() -> Response {
    Json(RootResponse {
        name: "LearningToy API",
        version: env!("CARGO_PKG_VERSION"),
        status: "healthy",
    })
    .into_response()
}

pub async fn health(State(state): State<AppState>) -> Response {
    let database = match state.db_proxy() {
        Some(proxy) => {
            let probe = sqlx::query("SELECT 1 AS one")
                .fetch_one(proxy.pool())
                .await
                .and_then(|row| row.try_get::<i32, _>("one"));
            match probe {
                Ok(_) => "connected",
                Err(_) => "disconnected",
            }
        }
        None => "disconnected",
    };

    let healthy = database == "connected";
    let body = Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        database,
        uptime: state.uptime_seconds(),
    });

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, body).into_response()
}
