//! Shortening and resolution service
//!
//! Owns the mapping lifecycle: `Absent -> Live` on shorten, `Live -> Live`
//! (TTL reset) on resolve, back to `Absent` on expiry or delete.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

use crate::errors::{Result, ShortenerError};
use crate::services::{generate_code, is_self_reference};
use crate::storage::MappingStore;
use crate::utils::validate_url;

pub const INVALID_URL_MESSAGE: &str = "invalid url";
pub const SELF_REFERENCE_MESSAGE: &str = "you can't short the shortener!";
pub const NOT_FOUND_MESSAGE: &str = "short url not found";

/// Attempts made with freshly generated codes before giving up.
const GENERATE_ATTEMPTS: usize = 3;

// ============ Request/Response DTOs ============

/// Body of `POST /short`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    /// Caller-chosen code; empty or missing means "generate one"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
}

impl ShortenRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            short: None,
        }
    }

    pub fn with_short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }
}

/// A live mapping as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingResponse {
    pub url: String,
    pub short: String,
    pub expires_in_seconds: u64,
}

/// Settings the service needs from the static configuration.
#[derive(Debug, Clone)]
pub struct ShortenerSettings {
    /// TTL given to new mappings and restored on every resolve
    pub expiry: Duration,
    /// Address of this service; targets pointing here are refused
    pub public_address: String,
}

// ============ ShortenerService Implementation ============

pub struct ShortenerService {
    store: Arc<dyn MappingStore>,
    settings: ShortenerSettings,
}

impl ShortenerService {
    pub fn new(store: Arc<dyn MappingStore>, settings: ShortenerSettings) -> Self {
        Self { store, settings }
    }

    pub fn expiry(&self) -> Duration {
        self.settings.expiry
    }

    pub fn public_address(&self) -> &str {
        &self.settings.public_address
    }

    /// Create a mapping for `req.url`.
    ///
    /// The code is taken verbatim from `req.short` or generated. Insertion is
    /// a single set-if-absent call, so two requests racing for the same code
    /// cannot both succeed.
    pub async fn shorten(&self, req: ShortenRequest) -> Result<MappingResponse> {
        let url = req.url.trim().to_string();

        if let Err(e) = validate_url(&url) {
            debug!("Rejected url '{}': {}", url, e);
            return Err(ShortenerError::invalid_url(INVALID_URL_MESSAGE));
        }

        if is_self_reference(&url, &self.settings.public_address) {
            debug!("Rejected self-referencing url '{}'", url);
            return Err(ShortenerError::self_reference(SELF_REFERENCE_MESSAGE));
        }

        let code = match req.short.filter(|s| !s.is_empty()) {
            Some(custom) => {
                if !self.insert(&custom, &url).await? {
                    return Err(taken(&custom, &url));
                }
                custom
            }
            None => self.insert_generated(&url).await?,
        };

        info!(
            "Created mapping '{}' -> '{}' (expires in {}s)",
            code,
            url,
            self.settings.expiry.as_secs()
        );

        Ok(MappingResponse {
            url,
            short: code,
            expires_in_seconds: self.settings.expiry.as_secs(),
        })
    }

    async fn insert(&self, code: &str, url: &str) -> Result<bool> {
        self.store
            .set_if_absent(code, url, self.settings.expiry)
            .await
    }

    async fn insert_generated(&self, url: &str) -> Result<String> {
        let mut code = generate_code();
        for attempt in 1..=GENERATE_ATTEMPTS {
            if self.insert(&code, url).await? {
                return Ok(code);
            }
            warn!(
                "Generated code '{}' collided (attempt {}/{})",
                code, attempt, GENERATE_ATTEMPTS
            );
            if attempt < GENERATE_ATTEMPTS {
                code = generate_code();
            }
        }
        Err(taken(&code, url))
    }

    /// Target of `code`, with the mapping's TTL reset to the full expiry.
    ///
    /// The lookup alone decides the outcome. The TTL reset afterwards is best
    /// effort: a failure is logged and the target is still returned.
    pub async fn resolve(&self, code: &str) -> Result<String> {
        let target = self
            .store
            .get(code)
            .await?
            .ok_or_else(|| ShortenerError::not_found(NOT_FOUND_MESSAGE))?;

        self.refresh(code).await;
        Ok(target)
    }

    async fn refresh(&self, code: &str) {
        match self.store.expire(code, self.settings.expiry).await {
            Ok(true) => trace!("TTL reset for '{}'", code),
            Ok(false) => error!("Mapping '{}' vanished before its TTL could be reset", code),
            Err(e) => error!("Failed to reset TTL for '{}': {}", code, e),
        }
    }

    /// Read-only view of a mapping; the TTL is left untouched.
    pub async fn info(&self, code: &str) -> Result<MappingResponse> {
        let url = self
            .store
            .get(code)
            .await?
            .ok_or_else(|| ShortenerError::not_found(NOT_FOUND_MESSAGE))?;

        // The key can expire between the two calls.
        let remaining = self
            .store
            .ttl(code)
            .await?
            .ok_or_else(|| ShortenerError::not_found(NOT_FOUND_MESSAGE))?;

        Ok(MappingResponse {
            url,
            short: code.to_string(),
            expires_in_seconds: remaining.as_secs(),
        })
    }

    /// Administrative removal. Returns whether a live mapping was removed.
    pub async fn delete(&self, code: &str) -> Result<bool> {
        let removed = self.store.delete(code).await?;
        if removed {
            info!("Deleted mapping '{}'", code);
        }
        Ok(removed)
    }
}

fn taken(code: &str, url: &str) -> ShortenerError {
    ShortenerError::conflict(format!(
        "short url {} is already taken. Short {} with another one :)",
        code, url
    ))
}
