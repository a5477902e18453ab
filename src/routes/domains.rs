use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::require_user;
use crate::core::graph::{self, DomainGraph, GraphError};
use crate::db::operations::domain::{self, DomainRow};
use crate::db::operations::word::{self, NewTranslation, TranslationRow, WordRow};
use crate::db::DatabaseProxy;
use crate::response::{json_error, json_ok, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default = "default_include_system")]
    include_system: bool,
}

fn default_include_system() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct DomainCreateRequest {
    name: String,
    description: Option<String>,
    icon: Option<String>,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInput {
    language: String,
    text: String,
    phonetic: Option<String>,
    example_sentence: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCreateRequest {
    #[serde(default = "default_difficulty")]
    difficulty: String,
    image_url: Option<String>,
    #[serde(default)]
    sort_order: i32,
    translations: Vec<TranslationInput>,
    #[serde(default)]
    prerequisite_ids: Vec<Uuid>,
}

fn default_difficulty() -> String {
    "beginner".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DomainDto {
    id: Uuid,
    user_id: Option<Uuid>,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    color: Option<String>,
    is_system: bool,
    word_count: i64,
    created_at: NaiveDateTime,
}

impl DomainDto {
    fn new(row: &DomainRow, word_count: i64) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name.clone(),
            description: row.description.clone(),
            icon: row.icon.clone(),
            color: row.color.clone(),
            is_system: row.is_system,
            word_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslationDto {
    id: Uuid,
    language: String,
    text: String,
    phonetic: Option<String>,
    example_sentence: Option<String>,
}

impl From<&TranslationRow> for TranslationDto {
    fn from(row: &TranslationRow) -> Self {
        Self {
            id: row.id,
            language: row.language.clone(),
            text: row.text.clone(),
            phonetic: row.phonetic.clone(),
            example_sentence: row.example_sentence.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WordDto {
    id: Uuid,
    domain_id: Uuid,
    difficulty: String,
    image_url: Option<String>,
    sort_order: i32,
    is_active: bool,
    translations: Vec<TranslationDto>,
    prerequisite_ids: Vec<Uuid>,
    created_at: NaiveDateTime,
}

impl WordDto {
    fn new(row: &WordRow, translations: &[TranslationRow], prerequisite_ids: Vec<Uuid>) -> Self {
        Self {
            id: row.id,
            domain_id: row.domain_id,
            difficulty: row.difficulty.clone(),
            image_url: row.image_url.clone(),
            sort_order: row.sort_order,
            is_active: row.is_active,
            translations: translations.iter().map(TranslationDto::from).collect(),
            prerequisite_ids,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphNodeDto {
    id: Uuid,
    domain_id: Uuid,
    difficulty: String,
    image_url: Option<String>,
    translations: HashMap<String, String>,
    sort_order: i32,
}

#[derive(Debug, Serialize)]
struct GraphEdgeDto {
    from: Uuid,
    to: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DomainGraphDto {
    domain_id: Uuid,
    domain_name: String,
    nodes: Vec<GraphNodeDto>,
    edges: Vec<GraphEdgeDto>,
    levels: Vec<Vec<Uuid>>,
}

pub async fn list_domains(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;

    let domains = domain::list_visible(proxy.as_ref(), current.id, query.include_system).await?;
    let mut out = Vec::with_capacity(domains.len());
    for row in &domains {
        let count = domain::word_count(proxy.as_ref(), row.id).await?;
        out.push(DomainDto::new(row, count));
    }

    Ok(json_ok(out))
}

pub async fn create_domain(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<DomainCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;

    let name = payload.name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(AppError::validation("Domain name must be 1-100 characters"));
    }

    let now = Utc::now().naive_utc();
    let created = domain::insert(
        proxy.as_ref(),
        current.id,
        name,
        payload.description.as_deref(),
        payload.icon.as_deref(),
        payload.color.as_deref(),
        now,
    )
    .await?;
    tracing::info!(domain_id = %created.id, user_id = %current.id, "created custom domain");

    Ok((StatusCode::CREATED, json_ok(DomainDto::new(&created, 0))))
}

pub async fn get_domain(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(domain_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;

    let row = visible_domain(proxy.as_ref(), domain_id, current.id).await?;
    let count = domain::word_count(proxy.as_ref(), row.id).await?;
    Ok(json_ok(DomainDto::new(&row, count)))
}

pub async fn create_word(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(domain_id): Path<Uuid>,
    Json(payload): Json<WordCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;
    visible_domain(proxy.as_ref(), domain_id, current.id).await?;

    if payload.translations.is_empty() {
        return Err(AppError::validation(
            "A word needs at least one translation",
        ));
    }
    for translation in &payload.translations {
        if translation.text.trim().is_empty() || translation.text.len() > 200 {
            return Err(AppError::validation(
                "Translation text must be 1-200 characters",
            ));
        }
    }

    // Prerequisite edges must stay inside the domain and cannot point at the
    // word being created.
    let word_id = Uuid::new_v4();
    for &prerequisite_id in &payload.prerequisite_ids {
        if prerequisite_id == word_id
            || !word::exists_in_domain(proxy.as_ref(), prerequisite_id, domain_id).await?
        {
            return Err(json_error(
                StatusCode::BAD_REQUEST,
                "INVALID_PREREQUISITE",
                format!("Prerequisite {prerequisite_id} is not a word in this domain"),
            ));
        }
    }

    let translations: Vec<NewTranslation> = payload
        .translations
        .iter()
        .map(|t| NewTranslation {
            language: t.language.clone(),
            text: t.text.trim().to_string(),
            phonetic: t.phonetic.clone(),
            example_sentence: t.example_sentence.clone(),
        })
        .collect();

    let now = Utc::now().naive_utc();
    let created = word::insert_word(
        proxy.as_ref(),
        word_id,
        domain_id,
        &payload.difficulty,
        payload.image_url.as_deref(),
        payload.sort_order,
        &translations,
        &payload.prerequisite_ids,
        now,
    )
    .await?;

    let translations = word::translations_by_word(proxy.as_ref(), &[created.id]).await?;
    let dto = WordDto::new(
        &created,
        translations
            .get(&created.id)
            .map(|list| list.as_slice())
            .unwrap_or(&[]),
        payload.prerequisite_ids,
    );

    Ok((StatusCode::CREATED, json_ok(dto)))
}

pub async fn list_words(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(domain_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;
    visible_domain(proxy.as_ref(), domain_id, current.id).await?;

    let words = word::list_for_domain(proxy.as_ref(), domain_id, false).await?;
    let word_ids: Vec<Uuid> = words.iter().map(|w| w.id).collect();
    let translations = word::translations_by_word(proxy.as_ref(), &word_ids).await?;
    let edges = word::prerequisite_edges(proxy.as_ref(), domain_id).await?;

    let mut prereqs_by_word: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (word_id, prerequisite_id) in edges {
        prereqs_by_word.entry(word_id).or_default().push(prerequisite_id);
    }

    let out: Vec<WordDto> = words
        .iter()
        .map(|row| {
            WordDto::new(
                row,
                translations
                    .get(&row.id)
                    .map(|list| list.as_slice())
                    .unwrap_or(&[]),
                prereqs_by_word.remove(&row.id).unwrap_or_default(),
            )
        })
        .collect();

    Ok(json_ok(out))
}

/// Learning-graph view: nodes with labels, prerequisite edges, and the depth
/// level partition from the core resolver.
pub async fn domain_graph(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(domain_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (proxy, current) = require_user(&state, &headers).await?;
    let domain_row = visible_domain(proxy.as_ref(), domain_id, current.id).await?;

    let words = word::list_for_domain(proxy.as_ref(), domain_id, false).await?;
    let word_ids: Vec<Uuid> = words.iter().map(|w| w.id).collect();
    let translations = word::translations_by_word(proxy.as_ref(), &word_ids).await?;
    let edges = word::prerequisite_edges(proxy.as_ref(), domain_id).await?;

    let graph = DomainGraph::new(&word_ids, &edges).map_err(graph_error)?;
    let depths = graph.depths().map_err(graph_error)?;
    let levels = graph::levels(&graph, &depths);

    let nodes: Vec<GraphNodeDto> = words
        .iter()
        .map(|row| GraphNodeDto {
            id: row.id,
            domain_id: row.domain_id,
            difficulty: row.difficulty.clone(),
            image_url: row.image_url.clone(),
            translations: translations
                .get(&row.id)
                .map(|list| {
                    list.iter()
                        .map(|t| (t.language.clone(), t.text.clone()))
                        .collect()
                })
                .unwrap_or_default(),
            sort_order: row.sort_order,
        })
        .collect();

    let edge_dtos: Vec<GraphEdgeDto> = edges
        .iter()
        .map(|&(word_id, prerequisite_id)| GraphEdgeDto {
            from: prerequisite_id,
            to: word_id,
        })
        .collect();

    Ok(json_ok(DomainGraphDto {
        domain_id: domain_row.id,
        domain_name: domain_row.name,
        nodes,
        edges: edge_dtos,
        levels,
    }))
}

async fn visible_domain(
    proxy: &DatabaseProxy,
    domain_id: Uuid,
    user_id: Uuid,
) -> Result<DomainRow, AppError> {
    domain::get_visible(proxy, domain_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Domain not found"))
}

/// Authored-content integrity failures are server errors, with the cycle case
/// called out so operators can find the bad edge set.
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
