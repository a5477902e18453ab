use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::require_user;
use crate::db::operations::chat::{self, ChatMessageRow};
use crate::db::operations::user;
use crate::response::{json_ok, AppError};
use crate::services;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    session_id: Option<Uuid>,
    child_id: Uuid,
    message: String,
    domain_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageDto {
    role: String,
    content: String,
    word_id: Option<Uuid>,
    timestamp: NaiveDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatReplyDto {
    session_id: Uuid,
    message: MessageDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryMessageDto {
    id: Uuid,
    role: String,
    content: String,
    word_id: Option<Uuid>,
    timestamp: NaiveDateTime,
}

impl From<&ChatMessageRow> for HistoryMessageDto {
    fn from(row: &ChatMessageRow) -> Self {
        Self {
            id: row.id,
            role: row.role.clone(),
            content: row.content.clone(),
            word_id: row.word_id,
            timestamp: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDto {
    session_id: Uuid,
    child_id: Uuid,
    messages: Vec<HistoryMessageDto>,
}

/// Stores the child's message and answers with a scripted reply, creating the
/// session on first contact.
pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;

    user::get_child_for_user(proxy.as_ref(), payload.child_id, current.id)
        .await?
        .ok_or_else(|| AppError::not_found("Child not found"))?;

    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::validation("Message must not be empty"));
    }

    let now = Utc::now().naive_utc();
    let session = match payload.session_id {
        Some(session_id) => {
            chat::get_session_for_child(proxy.as_ref(), session_id, payload.child_id)
                .await?
                .ok_or_else(|| AppError::not_found("Session not found"))?
        }
        None => {
            chat::insert_session(proxy.as_ref(), payload.child_id, payload.domain_id, now).await?
        }
    };

    chat::insert_message(proxy.as_ref(), session.id, "user", message, None, now).await?;

    let reply_text = services::chat::respond(message);
    let reply =
        chat::insert_message(proxy.as_ref(), session.id, "assistant", reply_text, None, now)
            .await?;

    chat::bump_message_count(proxy.as_ref(), session.id, 2).await?;

    Ok(json_ok(ChatReplyDto {
        session_id: session.id,
        message: MessageDto {
            role: reply.role,
            content: reply.content,
            word_id: reply.word_id,
            timestamp: reply.created_at,
        },
    }))
}

pub async fn history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;

    let session = chat::get_session_for_user(proxy.as_ref(), session_id, current.id)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    let messages = chat::list_messages(proxy.as_ref(), session.id).await?;

    Ok(json_ok(HistoryDto {
        session_id: session.id,
        child_id: session.child_id,
        messages: messages.iter().map(HistoryMessageDto::from).collect(),
    }))
}
