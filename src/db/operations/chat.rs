use chrono::NaiveDateTime;
use sqlx::Row;
use uuid::Uuid;

use crate::db::DatabaseProxy;

#[derive(Debug, Clone)]
pub struct ChatSessionRow {
    pub id: Uuid,
    pub child_id: Uuid,
    pub domain_id: Option<Uuid>,
    pub started_at: NaiveDateTime,
    pub message_count: i32,
}

#[derive(Debug, Clone)]
pub struct ChatMessageRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub word_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
}

fn session_from_row(row: &sqlx::postgres::PgRow) -> Result<ChatSessionRow, sqlx::Error> {
    Ok(ChatSessionRow {
        id: row.try_get("id")?,
        child_id: row.try_get("child_id")?,
        domain_id: row.try_get("domain_id")?,
        started_at: row.try_get("started_at")?,
        message_count: row.try_get("message_count")?,
    })
}

fn message_from_row(row: &sqlx::postgres::PgRow) -> Result<ChatMessageRow, sqlx::Error> {
    Ok(ChatMessageRow {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        role: row.try_get("role")?,
        content: row.try_get("content")?,
        word_id: row.try_get("word_id")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn get_session_for_child(
    proxy: &DatabaseProxy,
    session_id: Uuid,
    child_id: Uuid,
) -> Result<Option<ChatSessionRow>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, child_id, domain_id, started_at, message_count
        FROM chat_sessions
        WHERE id = $1 AND child_id = $2
        "#,
    )
    .bind(session_id)
    .bind(child_id)
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(session_from_row).transpose()
}

/// Session lookup scoped through the owning parent, for history reads.
pub async fn get_session_for_user(
    proxy: &DatabaseProxy,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<Option<ChatSessionRow>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT s.id, s.child_id, s.domain_id, s.started_at, s.message_count
        FROM chat_sessions s
        JOIN children c ON c.id = s.child_id
        WHERE s.id = $1 AND c.user_id = $2
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(session_from_row).transpose()
}

pub async fn insert_session(
    proxy: &DatabaseProxy,
    child_id: Uuid,
    domain_id: Option<Uuid>,
    now: NaiveDateTime,
) -> Result<ChatSessionRow, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO chat_sessions (id, child_id, domain_id, started_at, message_count)
        VALUES ($1, $2, $3, $4, 0)
        RETURNING id, child_id, domain_id, started_at, message_count
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(child_id)
    .bind(domain_id)
    .bind(now)
    .fetch_one(proxy.pool())
    .await?;

    session_from_row(&row)
}

pub async fn insert_message(
    proxy: &DatabaseProxy,
    session_id: Uuid,
    role: &str,
    content: &str,
    word_id: Option<Uuid>,
    now: NaiveDateTime,
) -> Result<ChatMessageRow, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO chat_messages (id, session_id, role, content, word_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, session_id, role, content, word_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(session_id)
    .bind(role)
    .bind(content)
    .bind(word_id)
    .bind(now)
    .fetch_one(proxy.pool())
    .await?;

    message_from_row(&row)
}

pub async fn bump_message_count(
    proxy: &DatabaseProxy,
    session_id: Uuid,
    by: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"UPDATE chat_sessions SET message_count = message_count + $1 WHERE id = $2"#)
        .bind(by)
        .bind(session_id)
        .execute(proxy.pool())
        .await?;
    Ok(())
}

pub async fn list_messages(
    proxy: &DatabaseProxy,
    session_id: Uuid,
) -> Result<Vec<ChatMessageRow>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, session_id, role, content, word_id, created_at
        FROM chat_messages
        WHERE session_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(session_id)
    .fetch_all(proxy.pool())
    .await?;

    rows.iter().map(message_from_row).collect()
}
