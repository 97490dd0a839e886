use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, error, trace};

use crate::config::RedisConfig;
use crate::errors::{Result, ShortenerError};
use crate::storage::MappingStore;

/// Redis-backed mapping store.
///
/// Holds one `ConnectionManager`: a multiplexed connection that reconnects on
/// its own and is cloned per call, so concurrent handlers share it safely.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.connection_url()).map_err(|e| {
            ShortenerError::config(format!(
                "Invalid redis settings for address '{}': {}",
                config.address, e
            ))
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            error!(
                "Failed to connect to Redis: {}. Check Redis server status and address: {}",
                e, config.address
            );
            ShortenerError::backend(format!("Redis connection failed: {e}"))
        })?;

        debug!(
            "Redis connection established: {} (database {})",
            config.address, config.database
        );

        Ok(Self { connection })
    }

    fn conn(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl MappingStore for RedisStore {
    async fn get(&self, code: &str) -> Result<Option<String>> {
        let value: Option<String> = self.conn().get(code).await.map_err(|e| {
            error!("Failed to get key '{}': {}", code, e);
            ShortenerError::from(e)
        })?;
        trace!("GET {} -> {}", code, if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    async fn set(&self, code: &str, target: &str, ttl: Duration) -> Result<()> {
        self.conn()
            .set_ex::<_, _, ()>(code, target, ttl_secs(ttl))
            .await
            .map_err(|e| {
                error!("Failed to set key '{}': {}", code, e);
                ShortenerError::from(e)
            })
    }

    async fn set_if_absent(&self, code: &str, target: &str, ttl: Duration) -> Result<bool> {
        // SET key value NX EX secs replies OK when written and nil when the key exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(code)
            .arg(target)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs(ttl))
            .query_async(&mut self.conn())
            .await
            .map_err(|e| {
                error!("Failed to conditionally set key '{}': {}", code, e);
                ShortenerError::from(e)
            })?;
        Ok(reply.is_some())
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        let removed: i64 = self.conn().del(code).await.map_err(|e| {
            error!("Failed to delete key '{}': {}", code, e);
            ShortenerError::from(e)
        })?;
        Ok(removed > 0)
    }

    async fn expire(&self, code: &str, ttl: Duration) -> Result<bool> {
        let secs = i64::try_from(ttl_secs(ttl)).unwrap_or(i64::MAX);
        self.conn().expire(code, secs).await.map_err(|e| {
            error!("Failed to reset TTL for key '{}': {}", code, e);
            ShortenerError::from(e)
        })
    }

    async fn ttl(&self, code: &str) -> Result<Option<Duration>> {
        let secs: i64 = self.conn().ttl(code).await.map_err(|e| {
            error!("Failed to read TTL for key '{}': {}", code, e);
            ShortenerError::from(e)
        })?;

        // -2: no such key, -1: key without expiry
        Ok(match secs {
            -2 => None,
            s if s < 0 => Some(Duration::ZERO),
            s => Some(Duration::from_secs(s as u64)),
        })
    }

    async fn ping(&self) -> Result<()> {
        let pong: String = redis::cmd("PING")
            .query_async(&mut self.conn())
            .await
            .map_err(|e| ShortenerError::backend(format!("Redis ping failed: {e}")))?;
        debug!("Redis connection test successful: {}", pong);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
