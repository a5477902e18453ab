use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{self, require_user};
use crate::db::operations::user::{self, ChildRow, UserRow};
use crate::response::{json_error, json_ok, AppError};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChildCreateRequest {
    name: String,
    birth_date: Option<String>,
    #[serde(default = "default_language")]
    preferred_language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: Uuid,
    email: String,
    role: String,
    created_at: NaiveDateTime,
}

impl From<&UserRow> for UserDto {
    fn from(row: &UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email.clone(),
            role: row.role.clone(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenDto {
    access_token: String,
    token_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChildDto {
    id: Uuid,
    user_id: Uuid,
    name: String,
    birth_date: Option<NaiveDate>,
    avatar_url: Option<String>,
    preferred_language: String,
    created_at: NaiveDateTime,
}

impl From<&ChildRow> for ChildDto {
    fn from(row: &ChildRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name.clone(),
            birth_date: row.birth_date,
            avatar_url: row.avatar_url.clone(),
            preferred_language: row.preferred_language.clone(),
            created_at: row.created_at,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::validation("A valid email address is required"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let proxy = require_db(&state)?;

    if user::find_by_email(proxy.as_ref(), &email).await?.is_some() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "EMAIL_TAKEN",
            "Email already registered",
        ));
    }

    let password_hash = auth::hash_password(&payload.password).map_err(|err| {
        tracing::error!(error = %err, "password hash failed");
        AppError::internal("Internal server error")
    })?;

    let now = Utc::now().naive_utc();
    let created = user::insert_user(proxy.as_ref(), &email, &password_hash, now).await?;
    tracing::info!(user_id = %created.id, "registered new parent account");

    Ok((StatusCode::CREATED, json_ok(UserDto::from(&created))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let proxy = require_db(&state)?;
    let email = payload.email.trim().to_lowercase();

    let found = user::find_by_email(proxy.as_ref(), &email).await?;
    let valid = found
        .as_ref()
        .map(|row| auth::verify_password(&payload.password, &row.password_hash))
        .unwrap_or(false);

    let Some(row) = found.filter(|_| valid) else {
        return Err(AppError::unauthorized("Invalid email or password"));
    };

    let (token, _expires_at) = auth::sign_jwt_for_user(row.id, &row.email).map_err(|err| {
        tracing::error!(error = %err, "token signing failed");
        AppError::internal("Internal server error")
    })?;

    Ok(json_ok(TokenDto {
        access_token: token,
        token_type: "bearer",
    }))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (_proxy, current) = require_user(&state, &headers).await?;
    Ok(json_ok(UserDto::from(&current)))
}

pub async fn create_child(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChildCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;

    let name = payload.name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(AppError::validation("Child name must be 1-100 characters"));
    }

    let birth_date = match payload.birth_date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::validation("birthDate must be formatted YYYY-MM-DD"))?,
        ),
        None => None,
    };

    let now = Utc::now().naive_utc();
    let child = user::insert_child(
        proxy.as_ref(),
        current.id,
        name,
        birth_date,
        &payload.preferred_language,
        now,
    )
    .await?;

    Ok((StatusCode::CREATED, json_ok(ChildDto::from(&child))))
}

pub async fn list_children(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;
    let children = user::list_children(proxy.as_ref(), current.id).await?;
    Ok(json_ok(
        children.iter().map(ChildDto::from).collect::<Vec<_>>(),
    ))
}

fn require_db(state: &AppState) -> Result<std::sync::Arc<crate::db::DatabaseProxy>, AppError> {
    state.db_proxy().ok_or_else(|| {
        json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Service unavailable",
        )
    })
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
