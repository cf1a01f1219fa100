use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::episodes::CreatedResponse;
use crate::api::errors::ApiJson;
use crate::app::AppState;
use crate::db::collection::Collection;
use crate::db::store::{DocumentStore, StoreError};
use crate::error::AppError;
use crate::models::schemas::Inquiry;
use crate::models::validation::Validate;

/// Request payload for the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    /// `online` or `f2f`. An explicit `null` is kept as-is.
    #[serde(default = "default_preferred_mode")]
    pub preferred_mode: Option<String>,
}

fn default_preferred_mode() -> Option<String> {
    Some("online".to_string())
}

/// Core inquiry logic: validate and store the submission unchanged.
pub async fn process_submit_inquiry(
    store: &dyn DocumentStore,
    request: InquiryCreate,
) -> Result<CreatedResponse, AppError> {
    let inquiry = Inquiry {
        name: request.name,
        email: request.email,
        phone: request.phone,
        message: request.message,
        preferred_mode: request.preferred_mode,
    };
    inquiry.validate()?;

    let record = bson::to_document(&inquiry).map_err(StoreError::from)?;
    let id = store.insert(Collection::Inquiry, record).await?;

    tracing::info!(%id, "Inquiry received");

    Ok(CreatedResponse {
        id,
        status: "received".to_string(),
    })
}

/// Axum handler for `POST /contact`.
pub async fn submit_inquiry_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<InquiryCreate>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let response = process_submit_inquiry(state.store.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
