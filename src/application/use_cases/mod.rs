pub mod idempotency;
pub mod subscription;
pub mod user;
