//! Test server lifecycle management
//!
//! Each test gets its own server on a random port, a fresh copy of the
//! fixture database and a clock frozen at a chosen instant.

use super::constants::*;
use super::fixtures::create_test_directory;
use booking_directory_server::clock::FixedClock;
use booking_directory_server::directory_store::SqliteDirectoryStore;
use booking_directory_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A running directory server. Dropping it shuts the server down and removes
/// the temporary database.
pub struct TestServer {
    /// e.g. "http://127.0.0.1:12345"
    pub base_url: String,

    pub port: u16,

    /// The instant the server treats as "now"
    pub now: DateTime<Utc>,

    /// Store shared with the server, for direct assertions in tests
    pub store: Arc<SqliteDirectoryStore>,

    _temp_db_dir: TempDir,
    _shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server whose clock reads [`TEST_NOW`].
    pub async fn spawn() -> Self {
        Self::spawn_at(TEST_NOW).await
    }

    /// Spawns a server whose clock is frozen at `now` (RFC 3339).
    ///
    /// # Panics
    ///
    /// Panics if fixture creation, port binding or startup fails.
    pub async fn spawn_at(now: &str) -> Self {
        let now: DateTime<Utc> = now.parse().expect("Invalid RFC 3339 instant");

        let (temp_db_dir, db_path) =
            create_test_directory().expect("Failed to create test directory database");
        let store =
            Arc::new(SqliteDirectoryStore::new(&db_path).expect("Failed to open directory store"));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            static_dir: None,
        };
        let app = make_app(config, store.clone(), Arc::new(FixedClock(now)))
            .expect("Failed to build app");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url: format!("http://127.0.0.1:{}", port),
            port,
            now,
            store,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_for_ready().await;
        server
    }

    /// Polls the home page until it answers with its JSON document.
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        while start.elapsed() <= timeout {
            if let Ok(response) = client.get(format!("{}/", self.base_url)).send().await {
                let ready = response
                    .json::<serde_json::Value>()
                    .await
                    .map(|home| home["page"] == "home")
                    .unwrap_or(false);
                if ready {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
        }

        panic!(
            "Server did not become ready within {}ms",
            SERVER_READY_TIMEOUT_MS
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
