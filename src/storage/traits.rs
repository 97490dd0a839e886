use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

/// Key-value backend holding `code -> target` with native expiry.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Target for `code`, `None` when the key is absent or expired.
    async fn get(&self, code: &str) -> Result<Option<String>>;

    /// Unconditionally store `code -> target` for `ttl`.
    async fn set(&self, code: &str, target: &str, ttl: Duration) -> Result<()>;

    /// Store `code -> target` for `ttl` only if `code` is not live.
    ///
    /// Returns `false` without writing when the code is taken. The check and
    /// the write are a single atomic operation on the backend.
    async fn set_if_absent(&self, code: &str, target: &str, ttl: Duration) -> Result<bool>;

    /// Returns `true` if a live key was removed.
    async fn delete(&self, code: &str) -> Result<bool>;

    /// Reset the remaining lifetime of `code`. Returns `false` if absent.
    async fn expire(&self, code: &str, ttl: Duration) -> Result<bool>;

    /// Remaining lifetime, `None` if absent. A key with no expiry reports zero.
    async fn ttl(&self, code: &str) -> Result<Option<Duration>>;

    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}
