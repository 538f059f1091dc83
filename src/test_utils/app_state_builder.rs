//! Test app state builder for HTTP-level integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{subscription::SubscriptionUseCases, user::AuthUseCases},
    domain::entities::{plan::Plan, subscription::SubscriptionProfile, user::User},
    infra::config::AppConfig,
    test_utils::{InMemoryIdempotencyStore, InMemorySubscriptionRepo, InMemoryUserRepo},
};

fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: SecretString::new("test-jwt-secret".into()),
        token_ttl: Duration::hours(1),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
        database_url: String::new(),
        redis_url: String::new(),
        checkout_base_url: Url::parse("https://payment-provider.com/checkout").unwrap(),
        idempotency_ttl_secs: 86_400,
    }
}

/// Builder for creating `AppState` backed by in-memory mocks.
///
/// # Example
///
/// ```ignore
/// let subscription = create_test_subscription(user_id, |s| {
///     s.status = SubscriptionStatus::Active;
/// });
/// let app_state = TestAppStateBuilder::new()
///     .with_subscription(subscription)
///     .build();
/// ```
#[derive(Default)]
pub struct TestAppStateBuilder {
    subscriptions: Vec<SubscriptionProfile>,
    users: Vec<User>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscription(mut self, subscription: SubscriptionProfile) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn build(self) -> AppState {
        let config = Arc::new(test_config());

        let subscription_repo = Arc::new(InMemorySubscriptionRepo::with_subscriptions(
            self.subscriptions,
        ));
        let user_repo = Arc::new(InMemoryUserRepo::with_users(self.users));
        let idempotency_store = Arc::new(InMemoryIdempotencyStore::new());

        let auth_use_cases = AuthUseCases::new(
            user_repo,
            config.jwt_secret.clone(),
            config.token_ttl,
        );

        let subscription_use_cases = SubscriptionUseCases::new(
            subscription_repo,
            Plan::premium_monthly(),
            config.checkout_base_url.to_string(),
        );

        AppState {
            config,
            auth_use_cases: Arc::new(auth_use_cases),
            subscription_use_cases: Arc::new(subscription_use_cases),
            idempotency_store,
        }
    }
}
