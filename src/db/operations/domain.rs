use chrono::NaiveDateTime;
use sqlx::Row;
use uuid::Uuid;

use crate::db::DatabaseProxy;

#[derive(Debug, Clone)]
pub struct DomainRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_system: bool,
    pub created_at: NaiveDateTime,
}

fn from_row(row: &sqlx::postgres::PgRow) -> Result<DomainRow, sqlx::Error> {
    Ok(DomainRow {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        icon: row.try_get("icon")?,
        color: row.try_get("color")?,
        is_system: row.try_get("is_system")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Domains the user can see: their own, plus system domains when requested.
pub async fn list_visible(
    proxy: &DatabaseProxy,
    user_id: Uuid,
    include_system: bool,
) -> Result<Vec<DomainRow>, sqlx::Error> {
    let sql = if include_system {
        r#"
        SELECT id, user_id, name, description, icon, color, is_system, created_at
        FROM domains
        WHERE user_id = $1 OR is_system = TRUE
        ORDER BY created_at
        "#
    } else {
        r#"
        SELECT id, user_id, name, description, icon, color, is_system, created_at
        FROM domains
        WHERE user_id = $1
        ORDER BY created_at
        "#
    };

    let rows = sqlx::query(sql).bind(user_id).fetch_all(proxy.pool()).await?;
    rows.iter().map(from_row).collect()
}

pub async fn get_visible(
    proxy: &DatabaseProxy,
    domain_id: Uuid,
    user_id: Uuid,
) -> Result<Option<DomainRow>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, name, description, icon, color, is_system, created_at
        FROM domains
        WHERE id = $1 AND (user_id = $2 OR is_system = TRUE)
        "#,
    )
    .bind(domain_id)
    .bind(user_id)
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(from_row).transpose()
}

pub async fn insert(
    proxy: &DatabaseProxy,
    user_id: Uuid,
    name: &str,
    description: Option<&str>,
    icon: Option<&str>,
    color: Option<&str>,
    now: NaiveDateTime,
) -> Result<DomainRow, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO domains (id, user_id, name, description, icon, color, is_system, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, $7)
        RETURNING id, user_id, name, description, icon, color, is_system, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .bind(description)
    .bind(icon)
    .bind(color)
    .bind(now)
    .fetch_one(proxy.pool())
    .await?;

    from_row(&row)
}

pub async fn word_count(proxy: &DatabaseProxy, domain_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(r#"SELECT COUNT(*) AS count FROM words WHERE domain_id = $1"#)
        .bind(domain_id)
        .fetch_one(proxy.pool())
        .await?;
    row.try_get("count")
}
