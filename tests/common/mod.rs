use std::sync::Arc;

use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use advisor_api::app::{self, AppState};
use advisor_api::db::store::{DocumentStore, MongoDocumentStore};
use advisor_api::settings::Settings;

pub const TEST_DATABASE: &str = "advisor_test";

/// Holds a running MongoDB container and the router wired to it.
///
/// The container lives as long as this struct; dropping it stops and removes
/// the container.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub router: Router,
    pub store: Arc<dyn DocumentStore>,
    /// Raw database handle, for seeding documents the API would never write.
    pub db: mongodb::Database,
}

impl TestEnv {
    /// Start MongoDB and build an Axum router wired to it.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);

        let client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let db = client.database(TEST_DATABASE);
        let store: Arc<dyn DocumentStore> = Arc::new(MongoDocumentStore::new(db.clone()));

        let settings = Settings {
            database_url: Some(mongo_uri),
            database_name: Some(TEST_DATABASE.to_string()),
            ..Settings::default()
        };
        let router = app::router(AppState::new(store.clone(), settings));

        Self {
            _mongo: mongo_container,
            router,
            store,
            db,
        }
    }

    /// Build an `axum_test::TestServer` that expects every request to succeed.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: publish an episode via the API.
    pub async fn create_episode(
        &self,
        server: &axum_test::TestServer,
        title: &str,
        audio_url: &str,
    ) -> axum_test::TestResponse {
        server
            .post("/episodes")
            .json(&serde_json::json!({
                "title": title,
                "audio_url": audio_url,
            }))
            .await
    }

    /// Helper: count the documents in a collection.
    pub async fn count(&self, collection: &str) -> u64 {
        self.db
            .collection::<mongodb::bson::Document>(collection)
            .count_documents(mongodb::bson::doc! {})
            .await
            .expect("Failed to count documents")
    }
}

/// Build a `TestServer` whose store points at a port nothing listens on.
pub fn server_with_broken_store() -> axum_test::TestServer {
    let options = mongodb::options::ClientOptions::builder()
        .hosts(vec![mongodb::options::ServerAddress::Tcp {
            host: "127.0.0.1".to_string(),
            port: Some(1),
        }])
        .server_selection_timeout(std::time::Duration::from_millis(200))
        .build();
    let client = mongodb::Client::with_options(options).expect("Failed to build client");
    let store: Arc<dyn DocumentStore> =
        Arc::new(MongoDocumentStore::new(client.database(TEST_DATABASE)));

    let settings = Settings {
        database_url: Some("mongodb://127.0.0.1:1".to_string()),
        database_name: Some(TEST_DATABASE.to_string()),
        ..Settings::default()
    };

    axum_test::TestServer::builder()
        .build(app::router(AppState::new(store, settings)))
}
