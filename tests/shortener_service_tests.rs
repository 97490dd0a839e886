//! ShortenerService tests
//!
//! Exercises the mapping lifecycle against the in-memory store, plus a
//! scripted store for backend failures and code collisions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use shortener::errors::{Result, ShortenerError};
use shortener::services::{
    GENERATED_CODE_LEN, NOT_FOUND_MESSAGE, SELF_REFERENCE_MESSAGE, ShortenRequest,
    ShortenerService, ShortenerSettings,
};
use shortener::storage::{MappingStore, MemoryStore};

const EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);
const SERVICE_ADDRESS: &str = "localhost:8080";

// =============================================================================
// Test Setup
// =============================================================================

fn settings() -> ShortenerSettings {
    ShortenerSettings {
        expiry: EXPIRY,
        public_address: SERVICE_ADDRESS.to_string(),
    }
}

fn memory_service() -> (ShortenerService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = ShortenerService::new(store.clone(), settings());
    (service, store)
}

/// Store wrapper whose individual operations can be switched to fail
#[derive(Default)]
struct ScriptedStore {
    inner: MemoryStore,
    fail_get: AtomicBool,
    fail_insert: AtomicBool,
    fail_expire: AtomicBool,
    fail_ttl: AtomicBool,
    /// The key is deleted just before the TTL reset reaches the store
    vanish_before_expire: AtomicBool,
    /// Every set-if-absent call reports the code as taken
    always_taken: AtomicBool,
    insert_calls: AtomicUsize,
    expire_calls: AtomicUsize,
}

impl ScriptedStore {
    fn check(flag: &AtomicBool, op: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(ShortenerError::backend(format!("{} failed: connection refused", op)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MappingStore for ScriptedStore {
    async fn get(&self, code: &str) -> Result<Option<String>> {
        Self::check(&self.fail_get, "GET")?;
        self.inner.get(code).await
    }

    async fn set(&self, code: &str, target: &str, ttl: Duration) -> Result<()> {
        Self::check(&self.fail_insert, "SET")?;
        self.inner.set(code, target, ttl).await
    }

    async fn set_if_absent(&self, code: &str, target: &str, ttl: Duration) -> Result<bool> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_insert, "SET NX")?;
        if self.always_taken.load(Ordering::SeqCst) {
            return Ok(false);
        }
        self.inner.set_if_absent(code, target, ttl).await
    }

    async fn delete(&self, code: &str) -> Result<bool> {
        self.inner.delete(code).await
    }

    async fn expire(&self, code: &str, ttl: Duration) -> Result<bool> {
        self.expire_calls.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_expire, "EXPIRE")?;
        if self.vanish_before_expire.load(Ordering::SeqCst) {
            self.inner.delete(code).await?;
        }
        self.inner.expire(code, ttl).await
    }

    async fn ttl(&self, code: &str) -> Result<Option<Duration>> {
        Self::check(&self.fail_ttl, "TTL")?;
        self.inner.ttl(code).await
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "scripted"
    }
}

fn scripted_service() -> (ShortenerService, Arc<ScriptedStore>) {
    let store = Arc::new(ScriptedStore::default());
    let service = ShortenerService::new(store.clone(), settings());
    (service, store)
}

// =============================================================================
// shorten
// =============================================================================

#[tokio::test]
async fn test_shorten_with_custom_code() {
    let (service, store) = memory_service();

    let created = service
        .shorten(ShortenRequest::new("https://www.testsite1.com").with_short("abc"))
        .await
        .unwrap();

    assert_eq!(created.url, "https://www.testsite1.com");
    assert_eq!(created.short, "abc");
    assert_eq!(created.expires_in_seconds, EXPIRY.as_secs());
    assert_eq!(
        store.get("abc").await.unwrap().as_deref(),
        Some("https://www.testsite1.com")
    );
}

#[tokio::test]
async fn test_shorten_generates_six_char_code() {
    let (service, store) = memory_service();

    let created = service
        .shorten(ShortenRequest::new("https://example.com/some/long/path"))
        .await
        .unwrap();

    assert_eq!(created.short.len(), GENERATED_CODE_LEN);
    assert!(created.short.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        store.get(&created.short).await.unwrap().as_deref(),
        Some("https://example.com/some/long/path")
    );
}

#[tokio::test]
async fn test_empty_short_means_generate() {
    let (service, _store) = memory_service();

    let created = service
        .shorten(ShortenRequest::new("https://example.com").with_short(""))
        .await
        .unwrap();

    assert_eq!(created.short.len(), GENERATED_CODE_LEN);
}

#[tokio::test]
async fn test_shorten_trims_url() {
    let (service, store) = memory_service();

    let created = service
        .shorten(ShortenRequest::new("  https://example.com/a \n").with_short("trim"))
        .await
        .unwrap();

    assert_eq!(created.url, "https://example.com/a");
    assert_eq!(
        store.get("trim").await.unwrap().as_deref(),
        Some("https://example.com/a")
    );
}

#[tokio::test]
async fn test_taken_code_is_conflict_and_keeps_original() {
    let (service, store) = memory_service();

    service
        .shorten(ShortenRequest::new("https://first.example.com").with_short("abc"))
        .await
        .unwrap();

    let err = service
        .shorten(ShortenRequest::new("https://second.example.com").with_short("abc"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ShortenerError::Conflict(
            "short url abc is already taken. Short https://second.example.com with another one :)"
                .to_string()
        )
    );
    assert_eq!(
        store.get("abc").await.unwrap().as_deref(),
        Some("https://first.example.com")
    );
}

#[tokio::test]
async fn test_invalid_urls_are_rejected() {
    let (service, store) = memory_service();

    for url in ["", "not a url", "www.example.com", "ftp://example.com", "javascript:alert(1)"] {
        let err = service
            .shorten(ShortenRequest::new(url).with_short("bad"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ShortenerError::InvalidUrl(ref m) if m == "invalid url"),
            "{url:?} gave {err:?}"
        );
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_self_reference_is_rejected() {
    let (service, store) = memory_service();

    for url in [
        "http://localhost:8080",
        "https://www.localhost:8080/abc",
        "http://LOCALHOST:8080/info/abc",
    ] {
        let err = service
            .shorten(ShortenRequest::new(url))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ShortenerError::SelfReference(SELF_REFERENCE_MESSAGE.to_string())
        );
    }

    assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_shortens_of_one_code_have_one_winner() {
    const CONTENDERS: usize = 16;
    let (service, store) = memory_service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|i| {
            let service = service.clone();
            tokio::spawn(async move {
                let url = format!("https://contender{}.example.com", i);
                let result = service
                    .shorten(ShortenRequest::new(url.clone()).with_short("race"))
                    .await;
                (url, result)
            })
        })
        .collect();

    let mut winners = Vec::new();
    let mut conflicts = 0;
    for handle in handles {
        let (url, result) = handle.await.unwrap();
        match result {
            Ok(created) => {
                assert_eq!(created.url, url);
                winners.push(url);
            }
            Err(ShortenerError::Conflict(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(conflicts, CONTENDERS - 1);
    assert_eq!(store.get("race").await.unwrap(), Some(winners[0].clone()));
}

#[tokio::test]
async fn test_unbounded_expiry_does_not_panic() {
    let store = Arc::new(MemoryStore::new());
    let service = ShortenerService::new(
        store.clone(),
        ShortenerSettings {
            expiry: Duration::from_secs(u64::MAX),
            public_address: SERVICE_ADDRESS.to_string(),
        },
    );

    let created = service
        .shorten(ShortenRequest::new("https://example.com"))
        .await
        .unwrap();
    assert_eq!(
        service.resolve(&created.short).await.unwrap(),
        "https://example.com"
    );
}

#[tokio::test]
async fn test_generated_collisions_retry_then_conflict() {
    let (service, store) = scripted_service();
    store.always_taken.store(true, Ordering::SeqCst);

    let err = service
        .shorten(ShortenRequest::new("https://example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::Conflict(_)));
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_custom_code_is_not_retried() {
    let (service, store) = scripted_service();
    store.always_taken.store(true, Ordering::SeqCst);

    let err = service
        .shorten(ShortenRequest::new("https://example.com").with_short("mine"))
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::Conflict(_)));
    assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_shorten_backend_failure() {
    let (service, store) = scripted_service();
    store.fail_insert.store(true, Ordering::SeqCst);

    let err = service
        .shorten(ShortenRequest::new("https://example.com").with_short("abc"))
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::Backend(_)));
}

// =============================================================================
// resolve
// =============================================================================

#[tokio::test]
async fn test_resolve_unknown_code() {
    let (service, _store) = memory_service();

    let err = service.resolve("nope").await.unwrap_err();
    assert_eq!(err, ShortenerError::NotFound(NOT_FOUND_MESSAGE.to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_resolve_resets_ttl() {
    let (service, _store) = memory_service();
    service
        .shorten(ShortenRequest::new("https://example.com").with_short("abc"))
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(3600)).await;
    let before = service.info("abc").await.unwrap();
    assert_eq!(before.expires_in_seconds, EXPIRY.as_secs() - 3600);

    assert_eq!(service.resolve("abc").await.unwrap(), "https://example.com");

    let after = service.info("abc").await.unwrap();
    assert_eq!(after.expires_in_seconds, EXPIRY.as_secs());
}

#[tokio::test(start_paused = true)]
async fn test_used_links_outlive_the_expiry() {
    let (service, _store) = memory_service();
    service
        .shorten(ShortenRequest::new("https://example.com").with_short("abc"))
        .await
        .unwrap();

    // Three resolutions spaced closer than the expiry keep the link alive
    // well past the original deadline.
    for _ in 0..3 {
        tokio::time::advance(EXPIRY - Duration::from_secs(60)).await;
        assert_eq!(service.resolve("abc").await.unwrap(), "https://example.com");
    }

    tokio::time::advance(EXPIRY + Duration::from_secs(1)).await;
    assert!(matches!(
        service.resolve("abc").await,
        Err(ShortenerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_resolve_survives_refresh_failure() {
    let (service, store) = scripted_service();
    service
        .shorten(ShortenRequest::new("https://example.com").with_short("abc"))
        .await
        .unwrap();
    store.fail_expire.store(true, Ordering::SeqCst);

    let target = service.resolve("abc").await.unwrap();

    assert_eq!(target, "https://example.com");
    assert_eq!(store.expire_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_resolve_survives_key_vanishing_before_refresh() {
    let (service, store) = scripted_service();
    service
        .shorten(ShortenRequest::new("https://example.com").with_short("abc"))
        .await
        .unwrap();
    store.vanish_before_expire.store(true, Ordering::SeqCst);

    assert_eq!(service.resolve("abc").await.unwrap(), "https://example.com");
    assert_eq!(store.expire_calls.load(Ordering::SeqCst), 1);
    assert!(matches!(
        service.resolve("abc").await,
        Err(ShortenerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_resolve_lookup_failure() {
    let (service, store) = scripted_service();
    store.fail_get.store(true, Ordering::SeqCst);

    let err = service.resolve("abc").await.unwrap_err();
    assert!(matches!(err, ShortenerError::Backend(_)));
    assert_eq!(store.expire_calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// info
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_info_does_not_refresh() {
    let (service, _store) = memory_service();
    service
        .shorten(ShortenRequest::new("https://example.com").with_short("abc"))
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(100)).await;
    let first = service.info("abc").await.unwrap();
    tokio::time::advance(Duration::from_secs(100)).await;
    let second = service.info("abc").await.unwrap();

    assert_eq!(first.url, "https://example.com");
    assert_eq!(first.short, "abc");
    assert_eq!(first.expires_in_seconds, EXPIRY.as_secs() - 100);
    assert_eq!(second.expires_in_seconds, EXPIRY.as_secs() - 200);
}

#[tokio::test]
async fn test_info_unknown_code() {
    let (service, _store) = memory_service();

    assert!(matches!(
        service.info("nope").await,
        Err(ShortenerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_info_ttl_failure() {
    let (service, store) = scripted_service();
    service
        .shorten(ShortenRequest::new("https://example.com").with_short("abc"))
        .await
        .unwrap();
    store.fail_ttl.store(true, Ordering::SeqCst);

    let err = service.info("abc").await.unwrap_err();
    assert!(matches!(err, ShortenerError::Backend(_)));
    assert_eq!(store.expire_calls.load(Ordering::SeqCst), 0);
}

// =============================================================================
// delete
// =============================================================================

#[tokio::test]
async fn test_delete_then_code_is_reusable() {
    let (service, _store) = memory_service();
    service
        .shorten(ShortenRequest::new("https://one.example.com").with_short("abc"))
        .await
        .unwrap();

    assert!(service.delete("abc").await.unwrap());
    assert!(!service.delete("abc").await.unwrap());

    let created = service
        .shorten(ShortenRequest::new("https://two.example.com").with_short("abc"))
        .await
        .unwrap();
    assert_eq!(created.url, "https://two.example.com");
}
