#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate, unreachable_pub)]
use serde_json::Value;
use std::sync::{Arc, Once};
use talkboard_server::AppBuilder;
use talkboard_server::adapters::storage::{MemoryMessageStore, MessageStore};
use talkboard_server::config::{
    Config, LogFormat, ServerConfig, StorageBackend, StorageConfig, TelemetryConfig,
};

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("talkboard_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0, shutdown_timeout_secs: 1 },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            table: "talk_messages_test".to_string(),
            region: "eu-central-1".to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
        },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

pub struct TestApp {
    pub server_url: String,
    pub client: reqwest::Client,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        Self::spawn_inner(config, Arc::new(MemoryMessageStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn MessageStore>) -> Self {
        Self::spawn_inner(get_test_config(), store).await
    }

    async fn spawn_inner(config: Config, store: Arc<dyn MessageStore>) -> Self {
        setup_tracing();

        let app = AppBuilder::new(config.clone()).with_store(store).build().unwrap();
        let router = talkboard_server::api::app_router(app.services);

        let listener =
            tokio::net::TcpListener::bind(format!("{}:{}", config.server.host, config.server.port)).await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { server_url: format!("http://{addr}"), client: reqwest::Client::new(), config }
    }

    pub fn messages_url(&self, room_id: &str) -> String {
        format!("{}/api/rooms/{}/messages", self.server_url, room_id)
    }

    pub async fn post_message(&self, room_id: &str, body: &Value) -> reqwest::Response {
        self.client.post(self.messages_url(room_id)).json(body).send().await.unwrap()
    }

    /// Creates a message and returns the stored record, asserting a 201.
    pub async fn create_message(&self, room_id: &str, body: &Value) -> Value {
        let resp = self.post_message(room_id, body).await;
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.unwrap()
    }

    pub async fn list_messages(&self, room_id: &str) -> Vec<Value> {
        let resp = self.client.get(self.messages_url(room_id)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        resp.json().await.unwrap()
    }

    pub async fn delete_message(&self, room_id: &str, msg_id: &str) -> reqwest::Response {
        self.client.delete(format!("{}/{}", self.messages_url(room_id), msg_id)).send().await.unwrap()
    }
}
