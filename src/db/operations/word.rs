use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{QueryBuilder, Row};
use uuid::Uuid;

use crate::db::DatabaseProxy;

#[derive(Debug, Clone)]
pub struct WordRow {
    pub id: Uuid,
    pub domain_id: Uuid,
    pub difficulty: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct TranslationRow {
    pub id: Uuid,
    pub word_id: Uuid,
    pub language: String,
    pub text: String,
    pub phonetic: Option<String>,
    pub example_sentence: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTranslation {
    pub language: String,
    pub text: String,
    pub phonetic: Option<String>,
    pub example_sentence: Option<String>,
}

fn word_from_row(row: &sqlx::postgres::PgRow) -> Result<WordRow, sqlx::Error> {
    Ok(WordRow {
        id: row.try_get("id")?,
        domain_id: row.try_get("domain_id")?,
        difficulty: row.try_get("difficulty")?,
        image_url: row.try_get("image_url")?,
        audio_url: row.try_get("audio_url")?,
        sort_order: row.try_get("sort_order")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

fn translation_from_row(row: &sqlx::postgres::PgRow) -> Result<TranslationRow, sqlx::Error> {
    Ok(TranslationRow {
        id: row.try_get("id")?,
        word_id: row.try_get("word_id")?,
        language: row.try_get("language")?,
        text: row.try_get("text")?,
        phonetic: row.try_get("phonetic")?,
        example_sentence: row.try_get("example_sentence")?,
    })
}

pub async fn list_for_domain(
    proxy: &DatabaseProxy,
    domain_id: Uuid,
    active_only: bool,
) -> Result<Vec<WordRow>, sqlx::Error> {
    let sql = if active_only {
        r#"
        SELECT id, domain_id, difficulty, image_url, audio_url, sort_order, is_active, created_at
        FROM words
        WHERE domain_id = $1 AND is_active = TRUE
        ORDER BY sort_order, created_at
        "#
    } else {
        r#"
        SELECT id, domain_id, difficulty, image_url, audio_url, sort_order, is_active, created_at
        FROM words
        WHERE domain_id = $1
        ORDER BY sort_order, created_at
        "#
    };

    let rows = sqlx::query(sql)
        .bind(domain_id)
        .fetch_all(proxy.pool())
        .await?;
    rows.iter().map(word_from_row).collect()
}

/// Translations for a word set, grouped by word id.
pub async fn translations_by_word(
    proxy: &DatabaseProxy,
    word_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<TranslationRow>>, sqlx::Error> {
    if word_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut qb = QueryBuilder::<sqlx::Postgres>::new(
        r#"
        SELECT id, word_id, language, text, phonetic, example_sentence
        FROM word_translations
        WHERE word_id IN (
        "#,
    );
    let mut separated = qb.separated(", ");
    for id in word_ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(") ORDER BY language");
    let rows = qb.build().fetch_all(proxy.pool()).await?;

    let mut map: HashMap<Uuid, Vec<TranslationRow>> = HashMap::new();
    for row in &rows {
        let translation = translation_from_row(row)?;
        map.entry(translation.word_id).or_default().push(translation);
    }
    Ok(map)
}

/// All (word, prerequisite) pairs whose dependent word belongs to the domain.
pub async fn prerequisite_edges(
    proxy: &DatabaseProxy,
    domain_id: Uuid,
) -> Result<Vec<(Uuid, Uuid)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT wp.word_id, wp.prerequisite_id
        FROM word_prerequisites wp
        JOIN words w ON w.id = wp.word_id
        WHERE w.domain_id = $1
        "#,
    )
    .bind(domain_id)
    .fetch_all(proxy.pool())
    .await?;

    rows.iter()
        .map(|row| {
            Ok((
                row.try_get::<Uuid, _>("word_id")?,
                row.try_get::<Uuid, _>("prerequisite_id")?,
            ))
        })
        .collect()
}

pub async fn exists_in_domain(
    proxy: &DatabaseProxy,
    word_id: Uuid,
    domain_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(r#"SELECT 1 AS one FROM words WHERE id = $1 AND domain_id = $2"#)
        .bind(word_id)
        .bind(domain_id)
        .fetch_optional(proxy.pool())
        .await?;
    Ok(row.is_some())
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_word(
    proxy: &DatabaseProxy,
    word_id: Uuid,
    domain_id: Uuid,
    difficulty: &str,
    image_url: Option<&str>,
    sort_order: i32,
    translations: &[NewTranslation],
    prerequisite_ids: &[Uuid],
    now: NaiveDateTime,
) -> Result<WordRow, sqlx::Error> {
    let mut tx = proxy.pool().begin().await?;

    let row = sqlx::query(
        r#"
        INSERT INTO words (id, domain_id, difficulty, image_url, sort_order, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6)
        RETURNING id, domain_id, difficulty, image_url, audio_url, sort_order, is_active, created_at
        "#,
    )
    .bind(word_id)
    .bind(domain_id)
    .bind(difficulty)
    .bind(image_url)
    .bind(sort_order)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    let word = word_from_row(&row)?;

    for translation in translations {
        sqlx::query(
            r#"
            INSERT INTO word_translations (id, word_id, language, text, phonetic, example_sentence, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(word_id)
        .bind(&translation.language)
        .bind(&translation.text)
        .bind(&translation.phonetic)
        .bind(&translation.example_sentence)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    for &prerequisite_id in prerequisite_ids {
        sqlx::query(
            r#"
            INSERT INTO word_prerequisites (id, word_id, prerequisite_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (word_id, prerequisite_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(word_id)
        .bind(prerequisite_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(word)
}
