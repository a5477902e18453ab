use chrono::{NaiveDate, NaiveDateTime};
use sqlx::Row;
use uuid::Uuid;

use crate::db::DatabaseProxy;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct ChildRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub avatar_url: Option<String>,
    pub preferred_language: String,
    pub created_at: NaiveDateTime,
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<UserRow, sqlx::Error> {
    Ok(UserRow {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: row.try_get("role")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn child_from_row(row: &sqlx::postgres::PgRow) -> Result<ChildRow, sqlx::Error> {
    Ok(ChildRow {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        birth_date: row.try_get("birth_date")?,
        avatar_url: row.try_get("avatar_url")?,
        preferred_language: row.try_get("preferred_language")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn find_by_email(
    proxy: &DatabaseProxy,
    email: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, email, password_hash, role, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(user_from_row).transpose()
}

pub async fn find_by_id(
    proxy: &DatabaseProxy,
    user_id: Uuid,
) -> Result<Option<UserRow>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, email, password_hash, role, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(user_from_row).transpose()
}

pub async fn insert_user(
    proxy: &DatabaseProxy,
    email: &str,
    password_hash: &str,
    now: NaiveDateTime,
) -> Result<UserRow, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
        VALUES ($1, $2, $3, 'parent', $4, $4)
        RETURNING id, email, password_hash, role, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .fetch_one(proxy.pool())
    .await?;

    user_from_row(&row)
}

pub async fn insert_child(
    proxy: &DatabaseProxy,
    user_id: Uuid,
    name: &str,
    birth_date: Option<NaiveDate>,
    preferred_language: &str,
    now: NaiveDateTime,
) -> Result<ChildRow, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO children (id, user_id, name, birth_date, preferred_language, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, name, birth_date, avatar_url, preferred_language, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(birth_date)
    .bind(preferred_language)
    .bind(now)
    .fetch_one(proxy.pool())
    .await?;

    child_from_row(&row)
}

pub async fn list_children(
    proxy: &DatabaseProxy,
    user_id: Uuid,
) -> Result<Vec<ChildRow>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, name, birth_date, avatar_url, preferred_language, created_at
        FROM children
        WHERE user_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(proxy.pool())
    .await?;

    rows.iter().map(child_from_row).collect()
}

/// Fetches a child only when it belongs to the given parent. Routes treat a
/// miss as 404 so child ids cannot be probed across accounts.
pub async fn get_child_for_user(
    proxy: &DatabaseProxy,
    child_id: Uuid,
    user_id: Uuid,
) -> Result<Option<ChildRow>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, name, birth_date, avatar_url, preferred_language, created_at
        FROM children
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(child_id)
    .bind(user_id)
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(child_from_row).transpose()
}
