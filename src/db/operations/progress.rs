use chrono::NaiveDateTime;
use sqlx::Row;
use uuid::Uuid;

use crate::core::mastery::ProgressState;
use crate::core::types::ProgressStatus;
use crate::db::DatabaseProxy;

#[derive(Debug, Clone)]
pub struct ProgressRow {
    pub id: Uuid,
    pub child_id: Uuid,
    pub word_id: Uuid,
    pub status: ProgressStatus,
    pub attempts: i32,
    pub correct_count: i32,
    pub streak_count: i32,
    pub last_practiced_at: Option<NaiveDateTime>,
    pub mastered_at: Option<NaiveDateTime>,
}

impl ProgressRow {
    /// Projection into the pure state machine's record type.
    pub fn to_state(&self) -> ProgressState {
        ProgressState {
            status: self.status,
            attempts: self.attempts,
            correct_count: self.correct_count,
            streak_count: self.streak_count,
            last_practiced_at: self.last_practiced_at,
            mastered_at: self.mastered_at,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempts <= 0 {
            0.0
        } else {
            self.correct_count as f64 / self.attempts as f64
        }
    }
}

fn from_row(row: &sqlx::postgres::PgRow) -> Result<ProgressRow, sqlx::Error> {
    let raw_status: String = row.try_get("status")?;
    Ok(ProgressRow {
        id: row.try_get("id")?,
        child_id: row.try_get("child_id")?,
        word_id: row.try_get("word_id")?,
        // Rows are only ever written from the closed enum; treat stray text as
        // locked rather than failing the whole listing.
        status: ProgressStatus::parse(&raw_status).unwrap_or(ProgressStatus::Locked),
        attempts: row.try_get("attempts")?,
        correct_count: row.try_get("correct_count")?,
        streak_count: row.try_get("streak_count")?,
        last_practiced_at: row.try_get("last_practiced_at")?,
        mastered_at: row.try_get("mastered_at")?,
    })
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, child_id, word_id, status, attempts, correct_count, streak_count,
           last_practiced_at, mastered_at
    FROM progress
"#;

pub async fn list_for_child(
    proxy: &DatabaseProxy,
    child_id: Uuid,
    domain_id: Option<Uuid>,
) -> Result<Vec<ProgressRow>, sqlx::Error> {
    let rows = match domain_id {
        Some(domain_id) => {
            sqlx::query(
                r#"
                SELECT p.id, p.child_id, p.word_id, p.status, p.attempts, p.correct_count,
                       p.streak_count, p.last_practiced_at, p.mastered_at
                FROM progress p
                JOIN words w ON w.id = p.word_id
                WHERE p.child_id = $1 AND w.domain_id = $2
                "#,
            )
            .bind(child_id)
            .bind(domain_id)
            .fetch_all(proxy.pool())
            .await?
        }
        None => {
            sqlx::query(&format!("{SELECT_COLUMNS} WHERE child_id = $1"))
                .bind(child_id)
                .fetch_all(proxy.pool())
                .await?
        }
    };

    rows.iter().map(from_row).collect()
}

pub async fn get_for_child_word(
    proxy: &DatabaseProxy,
    child_id: Uuid,
    word_id: Uuid,
) -> Result<Option<ProgressRow>, sqlx::Error> {
    let row = sqlx::query(&format!(
        "{SELECT_COLUMNS} WHERE child_id = $1 AND word_id = $2"
    ))
    .bind(child_id)
    .bind(word_id)
    .fetch_optional(proxy.pool())
    .await?;

    row.as_ref().map(from_row).transpose()
}

/// Writes the full post-attempt state. Keyed on the (child_id, word_id) unique
/// constraint, so the record is created on first attempt and overwritten in
/// place afterwards.
pub async fn upsert(
    proxy: &DatabaseProxy,
    child_id: Uuid,
    word_id: Uuid,
    state: &ProgressState,
    now: NaiveDateTime,
) -> Result<ProgressRow, sqlx::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO progress (id, child_id, word_id, status, attempts, correct_count,
                              streak_count, last_practiced_at, mastered_at,
                              created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        ON CONFLICT (child_id, word_id) DO UPDATE SET
            status = EXCLUDED.status,
            attempts = EXCLUDED.attempts,
            correct_count = EXCLUDED.correct_count,
            streak_count = EXCLUDED.streak_count,
            last_practiced_at = EXCLUDED.last_practiced_at,
            mastered_at = EXCLUDED.mastered_at,
            updated_at = EXCLUDED.updated_at
        RETURNING id, child_id, word_id, status, attempts, correct_count, streak_count,
                  last_practiced_at, mastered_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(child_id)
    .bind(word_id)
    .bind(state.status.as_str())
    .bind(state.attempts)
    .bind(state.correct_count)
    .bind(state.streak_count)
    .bind(state.last_practiced_at)
    .bind(state.mastered_at)
    .bind(now)
    .fetch_one(proxy.pool())
    .await?;

    from_row(&row)
}
