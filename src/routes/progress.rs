use std::collections::{HashMap, HashSet};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::require_user;
use crate::core::graph::GraphError;
use crate::core::recommend::{self, CatalogWord};
use crate::core::types::{Difficulty, ProgressStatus};
use crate::core::{apply_attempt, recommend_next};
use crate::db::operations::progress::{self, ProgressRow};
use crate::db::operations::user;
use crate::db::operations::word;
use crate::db::DatabaseProxy;
use crate::response::{json_error, json_ok, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    domain_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextWordsQuery {
    domain_id: Uuid,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AttemptRequest {
    correct: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressDto {
    id: Uuid,
    word_id: Uuid,
    status: ProgressStatus,
    attempts: i32,
    correct_count: i32,
    streak_count: i32,
    accuracy: f64,
    last_practiced_at: Option<NaiveDateTime>,
    mastered_at: Option<NaiveDateTime>,
}

impl From<&ProgressRow> for ProgressDto {
    fn from(row: &ProgressRow) -> Self {
        Self {
            id: row.id,
            word_id: row.word_id,
            status: row.status,
            attempts: row.attempts,
            correct_count: row.correct_count,
            streak_count: row.streak_count,
            accuracy: round2(row.accuracy()),
            last_practiced_at: row.last_practiced_at,
            mastered_at: row.mastered_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverviewDto {
    total_words: usize,
    mastered: usize,
    practicing: usize,
    in_progress: usize,
    unlocked: usize,
    locked: usize,
    total_attempts: i64,
    total_correct: i64,
    accuracy: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NextWordDto {
    word_id: Uuid,
    word_text: HashMap<String, String>,
    status: ProgressStatus,
    difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
struct NextWordsDto {
    words: Vec<NextWordDto>,
}

pub async fn get_child_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(child_id): Path<Uuid>,
    Query(query): Query<ProgressQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;
    require_child(proxy.as_ref(), child_id, current.id).await?;

    let records = progress::list_for_child(proxy.as_ref(), child_id, query.domain_id).await?;
    Ok(json_ok(
        records.iter().map(ProgressDto::from).collect::<Vec<_>>(),
    ))
}

pub async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(child_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;
    require_child(proxy.as_ref(), child_id, current.id).await?;

    let records = progress::list_for_child(proxy.as_ref(), child_id, None).await?;

    let count_status = |status: ProgressStatus| {
        records
            .iter()
            .filter(|record| record.status == status)
            .count()
    };
    let total_attempts: i64 = records.iter().map(|record| record.attempts as i64).sum();
    let total_correct: i64 = records
        .iter()
        .map(|record| record.correct_count as i64)
        .sum();
    let accuracy = if total_attempts > 0 {
        round2(total_correct as f64 / total_attempts as f64)
    } else {
        0.0
    };

    Ok(json_ok(OverviewDto {
        total_words: records.len(),
        mastered: count_status(ProgressStatus::Mastered),
        practicing: count_status(ProgressStatus::Practicing),
        in_progress: count_status(ProgressStatus::InProgress),
        unlocked: count_status(ProgressStatus::Unlocked),
        locked: count_status(ProgressStatus::Locked),
        total_attempts,
        total_correct,
        accuracy,
    }))
}

/// Ranked next-word recommendations from the core engine, joined with display
/// labels for the client.
pub async fn next_words(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(child_id): Path<Uuid>,
    Query(query): Query<NextWordsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;
    require_child(proxy.as_ref(), child_id, current.id).await?;

    // The whole domain goes into the catalog; the engine itself restricts
    // candidates and unlock bonuses to active words while inactive
    // prerequisites keep gating their dependents.
    let words = word::list_for_domain(proxy.as_ref(), query.domain_id, false).await?;
    let edges = word::prerequisite_edges(proxy.as_ref(), query.domain_id).await?;
    let records = progress::list_for_child(proxy.as_ref(), child_id, None).await?;

    let mut mastered = HashSet::new();
    let mut progress_map = HashMap::new();
    for record in &records {
        progress_map.insert(record.word_id, record.status);
        if record.status.is_mastered() {
            mastered.insert(record.word_id);
        }
    }

    let catalog: Vec<CatalogWord> = words
        .iter()
        .map(|row| CatalogWord {
            id: row.id,
            difficulty: Difficulty::parse(&row.difficulty),
            sort_order: row.sort_order,
            is_active: row.is_active,
        })
        .collect();

    let limit = query.limit.unwrap_or(recommend::DEFAULT_LIMIT);
    let ranked = recommend_next(&catalog, &edges, &mastered, &progress_map, limit)
        .map_err(graph_error)?;

    let ranked_ids: Vec<Uuid> = ranked.iter().map(|r| r.word_id).collect();
    let translations = word::translations_by_word(proxy.as_ref(), &ranked_ids).await?;

    let words = ranked
        .iter()
        .map(|recommendation| NextWordDto {
            word_id: recommendation.word_id,
            word_text: translations
                .get(&recommendation.word_id)
                .map(|list| {
                    list.iter()
                        .map(|t| (t.language.clone(), t.text.clone()))
                        .collect()
                })
                .unwrap_or_default(),
            status: recommendation.status,
            difficulty: recommendation.difficulty,
        })
        .collect();

    Ok(json_ok(NextWordsDto { words }))
}

/// Records one practice attempt and runs the mastery state machine.
pub async fn record_attempt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((child_id, word_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;
    require_child(proxy.as_ref(), child_id, current.id).await?;

    let existing = progress::get_for_child_word(proxy.as_ref(), child_id, word_id).await?;

    let now = Utc::now().naive_utc();
    let updated = apply_attempt(
        existing.as_ref().map(|row| row.to_state()),
        payload.correct,
        now,
    );

    let saved = progress::upsert(proxy.as_ref(), child_id, word_id, &updated, now).await?;
    tracing::debug!(
        child_id = %child_id,
        word_id = %word_id,
        correct = payload.correct,
        status = saved.status.as_str(),
        "recorded practice attempt"
    );

    Ok(json_ok(ProgressDto::from(&saved)))
}

async fn require_child(
    proxy: &DatabaseProxy,
    child_id: Uuid,
    user_id: Uuid,
) -> Result<(), AppError> {
    user::get_child_for_user(proxy, child_id, user_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Child not found"))
}

fn graph_error(err: GraphError) -> AppError {
    tracing::error!(error = %err, "domain graph is inconsistent");
    match err {
        GraphError::CycleDetected => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "CYCLE_DETECTED",
            "The prerequisite graph contains a cycle",
        ),
        GraphError::InvalidEdge { .. } => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INVALID_EDGE",
            "The prerequisite graph references an unknown word",
        ),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
