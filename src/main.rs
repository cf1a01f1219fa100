use std::sync::Arc;

use anyhow::Context;
use tokio::signal;

use advisor_api::app::{self, AppState};
use advisor_api::db::store::{DocumentStore, MongoDocumentStore};
use advisor_api::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advisor_api=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting advisor API...");

    let settings = Settings::from_env().context("Failed to load settings")?;

    let store: Arc<dyn DocumentStore> = match (&settings.database_url, &settings.database_name) {
        (Some(uri), Some(name)) => {
            let store = MongoDocumentStore::connect(uri, name)
                .await
                .context("Invalid DATABASE_URL")?;
            tracing::info!("Using MongoDB database '{}'", name);
            Arc::new(store)
        }
        _ => {
            tracing::warn!("DATABASE_URL or DATABASE_NAME not set; database endpoints will fail");
            Arc::new(MongoDocumentStore::unavailable())
        }
    };

    let addr = settings.socket_addr();
    let router = app::router(AppState::new(store, settings));

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}
