use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use tokio::time::Instant;
use tracing::trace;

use crate::errors::Result;
use crate::storage::MappingStore;

struct Entry {
    target: String,
    expires_at: Instant,
}

/// Deadline used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE)
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-process mapping store.
///
/// Uses `DashMap` so concurrent handlers only contend on the shard holding
/// the key. Expired entries read as absent and are dropped when touched.
/// Deadlines use `tokio::time::Instant`, which follows a paused test clock.
#[derive(Default)]
pub struct MemoryStore {
    data: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live mappings.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.data.iter().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the entry if it has expired; returns whether it was dropped.
    fn evict_if_expired(&self, code: &str, now: Instant) -> bool {
        self.data.remove_if(code, |_, e| !e.is_live(now)).is_some()
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn get(&self, code: &str) -> Result<Option<String>> {
        let now = Instant::now();
        if self.evict_if_expired(code, now) {
            trace!("Evicted expired key: {}", code);
            return Ok(None);
        }
        Ok(self.data.get(code).map(|e| e.target.clone()))
    }

    async fn set(&self, code: &str, target: &str, ttl: Duration) -> Result<()> {
        self.data.insert(
            code.to_string(),
            Entry {
                target: target.to_string(),
                expires_at: deadline(Instant::now(), ttl),
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, code: &str, target: &str, ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        let entry = Entry {
            target: target.to_string(),
            expires_at: deadline(now, ttl),
        };

        // The shard lock is held across the check and the write.
        match self.data.entry(code.to_string()) {
            MapEntry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    return Ok(false);
                }
                occupied.insert(entry);
                Ok(true)
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(entry);
                Ok(true)
            }
        }
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .data
            .remove(code)
            .is_some_and(|(_, entry)| entry.is_live(now)))
    }

    async fn expire(&self, code: &str, ttl: Duration) -> Result<bool> {
        let now = Instant::now();
        if self.evict_if_expired(code, now) {
            return Ok(false);
        }
        match self.data.get_mut(code) {
            Some(mut entry) => {
                entry.expires_at = deadline(now, ttl);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, code: &str) -> Result<Option<Duration>> {
        let now = Instant::now();
        if self.evict_if_expired(code, now) {
            return Ok(None);
        }
        Ok(self
            .data
            .get(code)
            .map(|e| e.expires_at.saturating_duration_since(now)))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
