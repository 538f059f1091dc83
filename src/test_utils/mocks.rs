//! In-memory mock implementations for repository and store traits.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        idempotency::{IdempotencyStore, StoredResponse},
        subscription::{NewSubscription, SubscriptionRepo},
        user::{NewUser, UserRepo},
    },
    domain::entities::{
        subscription::{SubscriptionProfile, SubscriptionStatus},
        user::User,
    },
};

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<HashMap<Uuid, SubscriptionProfile>>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriptions(subscriptions: Vec<SubscriptionProfile>) -> Self {
        let map: HashMap<Uuid, SubscriptionProfile> =
            subscriptions.into_iter().map(|s| (s.id, s)).collect();
        Self {
            subscriptions: Mutex::new(map),
        }
    }

    pub fn record_count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn create(&self, input: &NewSubscription) -> AppResult<SubscriptionProfile> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let now = chrono::Utc::now().naive_utc();

        // Mirror the unique constraint on payment_intent_id.
        if subscriptions
            .values()
            .any(|s| s.payment_intent_id == input.payment_intent_id)
        {
            return Err(AppError::Database(
                "duplicate key value violates unique constraint \"subscriptions_payment_intent_id_key\""
                    .to_string(),
            ));
        }

        let subscription = SubscriptionProfile {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            plan_id: input.plan_id.clone(),
            status: SubscriptionStatus::Pending,
            payment_intent_id: input.payment_intent_id.clone(),
            current_period_end: None,
            canceled_at: None,
            created_at: Some(now),
            updated_at: Some(now),
        };

        subscriptions.insert(subscription.id, subscription.clone());
        Ok(subscription)
    }

    async fn find_blocking_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.user_id == user_id && s.status.is_open())
            .cloned())
    }

    async fn find_active_for_user(&self, user_id: Uuid) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.user_id == user_id && s.status == SubscriptionStatus::Active)
            .cloned())
    }

    async fn find_latest_reportable_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id && s.status.is_reportable())
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn find_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> AppResult<Option<SubscriptionProfile>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .find(|s| s.payment_intent_id == payment_intent_id)
            .cloned())
    }

    async fn mark_active(
        &self,
        id: Uuid,
        current_period_end: NaiveDateTime,
    ) -> AppResult<SubscriptionProfile> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions.get_mut(&id).ok_or(AppError::NotFound)?;
        subscription.status = SubscriptionStatus::Active;
        subscription.current_period_end = Some(current_period_end);
        subscription.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(subscription.clone())
    }

    async fn mark_payment_failed(&self, id: Uuid) -> AppResult<SubscriptionProfile> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions.get_mut(&id).ok_or(AppError::NotFound)?;
        subscription.status = SubscriptionStatus::PaymentFailed;
        subscription.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(subscription.clone())
    }

    async fn mark_canceled(
        &self,
        id: Uuid,
        status: SubscriptionStatus,
        canceled_at: NaiveDateTime,
    ) -> AppResult<SubscriptionProfile> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions.get_mut(&id).ok_or(AppError::NotFound)?;
        subscription.status = status;
        subscription.canceled_at = Some(canceled_at);
        subscription.updated_at = Some(chrono::Utc::now().naive_utc());
        Ok(subscription.clone())
    }
}

// ============================================================================
// InMemoryUserRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        let map: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Mutex::new(map),
        }
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn create(&self, input: &NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();

        // Mirror the unique constraint on email.
        if users.values().any(|u| u.email == input.email) {
            return Err(AppError::Database(
                "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            ));
        }

        let now = chrono::Utc::now().naive_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            name: input.name.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

// ============================================================================
// InMemoryIdempotencyStore
// ============================================================================

#[derive(Default)]
pub struct InMemoryIdempotencyStore {
    pub entries: Mutex<HashMap<String, (StoredResponse, Instant, u64)>>,
}

impl InMemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero out an entry's TTL so it reads as expired, for retention tests.
    pub fn expire(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(key) {
            entry.2 = 0;
        }
    }
}

#[async_trait]
impl IdempotencyStore for InMemoryIdempotencyStore {
    async fn get(&self, key: &str) -> AppResult<Option<StoredResponse>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).and_then(|(response, stored_at, ttl_secs)| {
            if stored_at.elapsed().as_secs() >= *ttl_secs {
                None
            } else {
                Some(response.clone())
            }
        }))
    }

    async fn put(&self, key: &str, response: &StoredResponse, ttl_secs: u64) -> AppResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (response.clone(), Instant::now(), ttl_secs));
        Ok(())
    }
}
