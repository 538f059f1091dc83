use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::idempotency::{IdempotencyStore, StoredResponse},
};

/// Redis-backed idempotency store. Records are written with `SET ... EX`,
/// so expiry is handled by Redis itself; an expired key reads as absent.
#[derive(Clone)]
pub struct RedisIdempotencyStore {
    manager: ConnectionManager,
}

impl RedisIdempotencyStore {
    pub async fn new(redis_url: &str) -> AppResult<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| {
            AppError::Internal(format!(
                "Redis connection failed (check redis password/URL): {e}"
            ))
        })?;
        let manager = ConnectionManager::new(client).await.map_err(|e| {
            AppError::Internal(format!(
                "Redis auth/connection failed (check redis password/URL): {e}"
            ))
        })?;

        Ok(Self { manager })
    }

    fn key(idempotency_key: &str) -> String {
        format!("idem:{idempotency_key}")
    }
}

#[async_trait]
impl IdempotencyStore for RedisIdempotencyStore {
    async fn get(&self, key: &str) -> AppResult<Option<StoredResponse>> {
        let mut conn = self.manager.clone();

        let raw: Option<String> = conn
            .get(Self::key(key))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        raw.map(|value| {
            serde_json::from_str(&value)
                .map_err(|e| AppError::Internal(format!("Corrupt idempotency record: {e}")))
        })
        .transpose()
    }

    async fn put(&self, key: &str, response: &StoredResponse, ttl_secs: u64) -> AppResult<()> {
        let mut conn = self.manager.clone();

        let value = serde_json::to_string(response)
            .map_err(|e| AppError::Internal(format!("Failed to serialize response: {e}")))?;

        let _: () = conn
            .set_ex(Self::key(key), value, ttl_secs.max(1))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(())
    }
}
