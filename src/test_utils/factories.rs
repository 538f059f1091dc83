//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible
//! defaults. Use the closure parameter to override specific fields.

use uuid::Uuid;

use crate::domain::entities::{
    subscription::{SubscriptionProfile, SubscriptionStatus},
    user::User,
};

/// Create a test subscription with sensible defaults.
pub fn create_test_subscription(
    user_id: Uuid,
    overrides: impl FnOnce(&mut SubscriptionProfile),
) -> SubscriptionProfile {
    let now = chrono::Utc::now().naive_utc();

    let mut subscription = SubscriptionProfile {
        id: Uuid::new_v4(),
        user_id,
        plan_id: "premium-monthly".to_string(),
        status: SubscriptionStatus::Active,
        payment_intent_id: format!("pi_test{}", Uuid::new_v4().simple()),
        current_period_end: Some(now + chrono::Duration::days(30)),
        canceled_at: None,
        created_at: Some(now),
        updated_at: Some(now),
    };
    overrides(&mut subscription);
    subscription
}

/// Create a test user with sensible defaults. The stored hash matches the
/// password "password123".
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let now = chrono::Utc::now().naive_utc();

    let mut user = User {
        id: Uuid::new_v4(),
        email: "user@example.com".to_string(),
        password_hash: crate::infra::password::hash_password("password123").unwrap(),
        name: None,
        created_at: Some(now),
        updated_at: Some(now),
    };
    overrides(&mut user);
    user
}
