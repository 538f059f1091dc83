pub mod app_state_builder;
pub mod factories;
pub mod mocks;

pub use app_state_builder::TestAppStateBuilder;
pub use factories::{create_test_subscription, create_test_user};
pub use mocks::{InMemoryIdempotencyStore, InMemorySubscriptionRepo, InMemoryUserRepo};
