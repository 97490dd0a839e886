//! Mapping storage
//!
//! `MappingStore` is the only seam between the shortening logic and the
//! key-value backend. Backends forward each call and keep "key absent"
//! (`Ok(None)` / `Ok(false)`) apart from connectivity failures (`Err`).

use std::sync::Arc;

use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::Result;

pub mod memory;
pub mod redis;
pub mod traits;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;
pub use self::traits::MappingStore;

pub struct StoreFactory;

impl StoreFactory {
    /// Build the configured backend and make sure it answers before returning.
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn MappingStore>> {
        let store: Arc<dyn MappingStore> = match config.backend {
            StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis).await?),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };

        store.ping().await?;
        info!("Using storage backend: {}", store.backend_name());
        Ok(store)
    }
}
