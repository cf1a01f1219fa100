use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use bson::{Bson, Document};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiJson;
use crate::app::AppState;
use crate::db::collection::Collection;
use crate::db::store::{id_to_string, DocumentStore, StoreError};
use crate::error::AppError;
use crate::models::schemas::PodcastEpisode;
use crate::models::validation::Validate;

/// Episodes returned when the client gives no `limit`.
pub const DEFAULT_LIMIT: i64 = 50;

/// Request payload for publishing an episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub audio_url: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An episode as listed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeOut {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub audio_url: String,
    pub cover_image_url: Option<String>,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
}

/// Response from a successful insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Episode document as it may be found in the store. Timestamps are
/// optional because documents written by other tools may lack them, and may
/// be BSON datetimes or ISO-8601 strings.
#[derive(Debug, Deserialize)]
struct StoredEpisode {
    #[serde(rename = "_id", default)]
    id: Bson,
    title: String,
    #[serde(default)]
    description: Option<String>,
    audio_url: String,
    #[serde(default)]
    cover_image_url: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    published_at: Option<Bson>,
    #[serde(default)]
    created_at: Option<Bson>,
}

/// Read a stored timestamp. Strings without an offset are taken as UTC.
fn parse_timestamp(field: &str, value: Option<Bson>) -> Result<Option<DateTime<Utc>>, String> {
    match value {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::DateTime(dt)) => Ok(Some(dt.to_chrono())),
        Some(Bson::String(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
            })
            .map(Some)
            .map_err(|e| format!("{field}: invalid datetime '{text}': {e}")),
        Some(other) => Err(format!("{field}: expected a datetime, got {other}")),
    }
}

impl StoredEpisode {
    fn into_output(self, now: DateTime<Utc>) -> Result<EpisodeOut, String> {
        let published_at = match parse_timestamp("published_at", self.published_at)? {
            Some(at) => at,
            None => parse_timestamp("created_at", self.created_at)?.unwrap_or(now),
        };

        Ok(EpisodeOut {
            id: id_to_string(&self.id),
            title: self.title,
            description: self.description,
            audio_url: self.audio_url,
            cover_image_url: self.cover_image_url,
            tags: self.tags.unwrap_or_default(),
            published_at,
        })
    }
}

/// Map the requested limit to the store cap. No limit means the default;
/// zero or a negative value means no cap at all.
fn effective_limit(requested: Option<i64>) -> Option<i64> {
    match requested {
        None => Some(DEFAULT_LIMIT),
        Some(n) if n > 0 => Some(n),
        Some(_) => None,
    }
}

/// Core listing logic — separated from the HTTP layer for testability.
pub async fn process_list_episodes(
    store: &dyn DocumentStore,
    limit: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Vec<EpisodeOut>, AppError> {
    let documents = store
        .fetch(
            Collection::PodcastEpisode,
            Document::new(),
            effective_limit(limit),
        )
        .await?;

    documents
        .into_iter()
        .map(|doc| {
            bson::from_document::<StoredEpisode>(doc)
                .map_err(|e| e.to_string())
                .and_then(|stored| stored.into_output(now))
                .map_err(|e| AppError::Internal(format!("Malformed episode document: {e}")))
        })
        .collect()
}

/// Core publishing logic: validate, stamp `published_at`, insert.
pub async fn process_create_episode(
    store: &dyn DocumentStore,
    request: EpisodeCreate,
    now: DateTime<Utc>,
) -> Result<CreatedResponse, AppError> {
    let mut episode = PodcastEpisode {
        title: request.title,
        description: request.description,
        audio_url: request.audio_url,
        cover_image_url: request.cover_image_url,
        published_at: now,
        tags: request.tags,
    };
    episode.validate()?;
    episode.normalize_urls();

    let record = bson::to_document(&episode).map_err(StoreError::from)?;
    let id = store.insert(Collection::PodcastEpisode, record).await?;

    tracing::info!(%id, title = %episode.title, "Episode created");

    Ok(CreatedResponse {
        id,
        status: "created".to_string(),
    })
}

/// Axum handler for `GET /episodes`.
pub async fn list_episodes_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<EpisodeOut>>, AppError> {
    let episodes = process_list_episodes(state.store.as_ref(), query.limit, Utc::now()).await?;
    Ok(Json(episodes))
}

/// Axum handler for `POST /episodes`.
pub async fn create_episode_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EpisodeCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let response = process_create_episode(state.store.as_ref(), request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
