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

use std::net::SocketAddr;
use std::time::Duration;
use talkboard_server::config::{Config, StorageBackend};
use talkboard_server::{AppBuilder, telemetry};
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let telemetry_guard = telemetry::init_telemetry(&config.telemetry)?;

    talkboard_server::setup_panic_hook();

    let boot_span = tracing::info_span!("boot_server");
    let (listener, app_router, shutdown_rx) = async {
        // Phase 1: Infrastructure
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        talkboard_server::spawn_signal_handler(shutdown_tx);

        let mut builder = AppBuilder::new(config.clone());
        if config.storage.backend == StorageBackend::DynamoDb {
            let client = talkboard_server::initialize_dynamodb_client(&config.storage).await;
            builder = builder.with_dynamodb(client);
        }

        // Phase 2: Wiring
        let app = builder.build()?;
        let app_router = talkboard_server::api::app_router(app.services);

        // Phase 3: Listener
        let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            address = %addr,
            table = %config.storage.table,
            region = %config.storage.region,
            backend = ?config.storage.backend,
            "listening"
        );

        Ok::<(tokio::net::TcpListener, axum::Router, watch::Receiver<bool>), anyhow::Error>((
            listener,
            app_router,
            shutdown_rx,
        ))
    }
    .instrument(boot_span)
    .await?;

    // Phase 4: Serve until a shutdown signal, draining in-flight requests
    let mut shutdown_rx = shutdown_rx;
    if let Err(e) = axum::serve(listener, app_router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.wait_for(|&s| s).await;
        })
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // Phase 5: Flush telemetry, bounded by the shutdown timeout
    let timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let flushed = tokio::time::timeout(timeout, tokio::task::spawn_blocking(move || telemetry_guard.shutdown())).await;
    if flushed.is_err() {
        tracing::warn!("Timeout waiting for telemetry to flush.");
    }

    Ok(())
}
