#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::adapters::storage::{DynamoMessageStore, MemoryMessageStore, MessageStore};
use crate::api::ServiceContainer;
use crate::config::{Config, StorageBackend, StorageConfig};
use crate::services::health_service::HealthService;
use crate::services::message_service::MessageService;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use std::sync::Arc;
use tokio::sync::watch;

/// Builds a DynamoDB client from the storage configuration.
///
/// Static credentials are used only when both keys are set; otherwise the default
/// AWS credential chain applies.
pub async fn initialize_dynamodb_client(config: &StorageConfig) -> aws_sdk_dynamodb::Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials = Credentials::new(access_key, secret_key, None, None, "talkboard-static");
        loader = loader.credentials_provider(credentials);
    }

    let sdk_config = loader.load().await;
    aws_sdk_dynamodb::Client::new(&sdk_config)
}

#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
}

/// Wires the message store into the services.
#[derive(Default)]
pub struct AppBuilder {
    config: Option<Config>,
    dynamodb: Option<aws_sdk_dynamodb::Client>,
    store: Option<Arc<dyn MessageStore>>,
}

impl std::fmt::Debug for AppBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppBuilder")
            .field("config", &self.config)
            .field("has_dynamodb", &self.dynamodb.is_some())
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

impl AppBuilder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config: Some(config), ..Self::default() }
    }

    #[must_use]
    pub fn with_dynamodb(mut self, client: aws_sdk_dynamodb::Client) -> Self {
        self.dynamodb = Some(client);
        self
    }

    /// Uses `store` regardless of the configured backend.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// # Errors
    /// Returns an error if no config was supplied, or if the DynamoDB backend is
    /// selected without a client.
    pub fn build(self) -> anyhow::Result<App> {
        let config = self.config.ok_or_else(|| anyhow::anyhow!("Config is required"))?;

        let store: Arc<dyn MessageStore> = match (self.store, config.storage.backend) {
            (Some(store), _) => store,
            (None, StorageBackend::Memory) => {
                tracing::warn!("Using in-memory message store; messages will not survive a restart");
                Arc::new(MemoryMessageStore::new())
            }
            (None, StorageBackend::DynamoDb) => {
                let client = self.dynamodb.ok_or_else(|| anyhow::anyhow!("DynamoDB client is required"))?;
                Arc::new(DynamoMessageStore::new(client, config.storage.table.clone()))
            }
        };

        let services = ServiceContainer {
            message_service: MessageService::new(store),
            health_service: HealthService::new(&config.storage),
        };

        Ok(App { services })
    }
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}

/// Routes panics through `tracing` before the default hook prints them.
pub fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Panic occurred");
        default_hook(info);
    }));
}
