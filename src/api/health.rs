use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::db::store::{DocumentStore, StoreHealth};
use crate::settings::Settings;

/// Probe errors are cut to this many characters in the status report.
const MAX_ERROR_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Best-effort status of the backend and its database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn set_flag(configured: bool) -> String {
    let flag = if configured { "✅ Set" } else { "❌ Not Set" };
    flag.to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Core diagnostics logic. Never fails: store problems end up as text.
pub async fn process_diagnostics(store: &dyn DocumentStore, settings: &Settings) -> StatusReport {
    let (database, connection_status, collections) = match store.diagnostics().await {
        StoreHealth::Uninitialized => (
            "⚠️  Available but not initialized".to_string(),
            "Not Connected",
            Vec::new(),
        ),
        StoreHealth::Working { collections } => {
            ("✅ Connected & Working".to_string(), "Connected", collections)
        }
        StoreHealth::Failing { error } => (
            format!(
                "⚠️  Connected but Error: {}",
                truncate_chars(&error, MAX_ERROR_CHARS)
            ),
            "Connected",
            Vec::new(),
        ),
    };

    StatusReport {
        backend: "✅ Running".to_string(),
        database,
        database_url: set_flag(settings.database_url.is_some()),
        database_name: set_flag(settings.database_name.is_some()),
        connection_status: connection_status.to_string(),
        collections,
    }
}

/// Axum handler for `GET /`.
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello from FastAPI Backend!".to_string(),
    })
}

/// Axum handler for `GET /api/hello`.
pub async fn hello_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello from the backend API!".to_string(),
    })
}

/// Axum handler for `GET /test`.
pub async fn diagnostics_handler(State(state): State<AppState>) -> Json<StatusReport> {
    Json(process_diagnostics(state.store.as_ref(), &state.settings).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::collection::Collection;
    use crate::db::memory::MemoryStore;
    use crate::db::store::{MockDocumentStore, MongoDocumentStore};

    fn configured() -> Settings {
        Settings {
            database_url: Some("mongodb://localhost:27017".to_string()),
            database_name: Some("advisor".to_string()),
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn test_diagnostics_working() {
        let store = MemoryStore::new();
        store.seed(Collection::Inquiry, bson::doc! { "name": "x" });

        let report = process_diagnostics(&store, &configured()).await;
        assert_eq!(report.backend, "✅ Running");
        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.database_url, "✅ Set");
        assert_eq!(report.database_name, "✅ Set");
        assert_eq!(report.collections, vec!["inquiry".to_string()]);
    }

    #[tokio::test]
    async fn test_diagnostics_uninitialized() {
        let store = MongoDocumentStore::unavailable();

        let report = process_diagnostics(&store, &Settings::default()).await;
        assert_eq!(report.database, "⚠️  Available but not initialized");
        assert_eq!(report.connection_status, "Not Connected");
        assert_eq!(report.database_url, "❌ Not Set");
        assert_eq!(report.database_name, "❌ Not Set");
        assert!(report.collections.is_empty());
    }

    #[tokio::test]
    async fn test_diagnostics_failing_truncates_error() {
        let mut store = MockDocumentStore::new();
        store.expect_diagnostics().returning(|| StoreHealth::Failing {
            error: "x".repeat(200),
        });

        let report = process_diagnostics(&store, &configured()).await;
        assert_eq!(
            report.database,
            format!("⚠️  Connected but Error: {}", "x".repeat(MAX_ERROR_CHARS))
        );
        assert_eq!(report.connection_status, "Connected");
        assert!(report.collections.is_empty());
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
