use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::app_error::AppResult;

/// Retention window for stored responses. An expired key behaves exactly
/// like a never-seen key.
pub const IDEMPOTENCY_TTL_SECS: u64 = 24 * 60 * 60;

/// A previously returned response, replayed verbatim for retried requests.
/// The status code is stored alongside the body so a replayed 202 stays a
/// 202.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// TTL'd key-value store backing the idempotency guard.
///
/// First successful write wins; only success-class responses are ever
/// stored, so a failed attempt may be retried under the same key. The guard
/// deliberately provides response caching rather than a distributed lock:
/// two concurrent requests with a fresh key can both execute, and the
/// storage-level uniqueness constraints are the correctness backstop.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<StoredResponse>>;
    async fn put(&self, key: &str, response: &StoredResponse, ttl_secs: u64) -> AppResult<()>;
}
