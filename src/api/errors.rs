use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::models::validation::ValidationErrors;

/// API-specific error wrapper that converts AppError into HTTP responses.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => {
                tracing::debug!("Rejected request: {errors}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    serde_json::json!({
                        "error": "Validation failed",
                        "fields": errors,
                    }),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": msg }),
            ),
            AppError::Database(msg) => {
                tracing::error!("Database error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": format!("Database error: {}", msg) }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": msg }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Body decoding failures. Well-formed JSON of the wrong shape is reported
/// per field; anything else is a plain bad request.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                AppError::Validation(ValidationErrors::single("body", e.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// JSON extractor whose rejections are rendered like every other API error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "value is not a valid email address: missing '@'");
        let response = AppError::Validation(errors).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["fields"][0]["field"], "email");
    }

    #[tokio::test]
    async fn test_database_error_response() {
        let response = AppError::Database("connection refused".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Database error: connection refused");
    }

    #[tokio::test]
    async fn test_bad_request_response() {
        let response = AppError::BadRequest("Expected JSON".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
