use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{ShortenerService, ShortenerSettings};
use crate::storage::StoreFactory;
use crate::utils::format_duration;

pub struct StartupContext {
    pub service: Arc<ShortenerService>,
}

/// 准备服务器启动的上下文
///
/// Connects the configured store and wires it into the shortener service.
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StoreFactory::create(&config.store)
        .await
        .with_context(|| format!("Failed to initialize {} store", config.store.backend))?;

    let settings = ShortenerSettings {
        expiry: config.store.expiry,
        public_address: config.server.public_address(),
    };
    info!(
        "Mappings expire after {} of inactivity, self-references to '{}' are refused",
        format_duration(settings.expiry),
        settings.public_address
    );

    let service = Arc::new(ShortenerService::new(store, settings));

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { service })
}
