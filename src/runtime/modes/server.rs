//! Server mode
//!
//! Builds the actix-web server around the shortener service and runs it
//! until it fails or a termination signal arrives.

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::middleware::RequestLogger;
use crate::api::{configure, not_found};
use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::utils::format_duration;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup(&config)
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {:#}", e);
            e
        })?;

    let service = startup.service.clone();
    let server_config = config.server.clone();
    let workers = server_config.workers.min(32);

    info!(
        "Server config: workers={}, read_timeout={}, write_timeout={}, idle_timeout={}, shutdown_timeout={}",
        workers,
        format_duration(server_config.read_timeout),
        format_duration(server_config.write_timeout),
        format_duration(server_config.idle_timeout),
        format_duration(server_config.shutdown_timeout),
    );

    let bind_address = server_config.bind_address();

    // Signals are handled by `listen_for_shutdown` so the grace period stays bounded.
    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(web::Data::new(service.clone()))
            .configure(configure)
            .default_service(web::to(not_found))
    })
    .keep_alive(server_config.idle_timeout)
    .client_request_timeout(server_config.read_timeout)
    .client_disconnect_timeout(server_config.write_timeout)
    .shutdown_timeout(server_config.shutdown_timeout.as_secs())
    .workers(workers)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Starting server at http://{}", bind_address);

    let handle = server.handle();
    tokio::pin!(server);

    tokio::select! {
        res = &mut server => {
            res?;
            return Ok(());
        }
        _ = lifetime::shutdown::listen_for_shutdown(handle, server_config.shutdown_timeout) => {}
    }

    (&mut server).await?;
    info!("Server stopped");
    Ok(())
}
