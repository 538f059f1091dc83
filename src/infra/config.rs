use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::application::use_cases::idempotency::IDEMPOTENCY_TTL_SECS;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub token_ttl: Duration,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub redis_url: String,
    /// Hosted-checkout base; the minted payment intent id is appended as the
    /// final path segment.
    pub checkout_base_url: Url,
    /// Retention window for stored idempotency responses.
    pub idempotency_ttl_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());

        let token_ttl_secs: i64 = get_env_default("TOKEN_TTL_SECS", 3600);

        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3002".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let redis_url: String = get_env_default("REDIS_URL", "redis://127.0.0.1:6379".to_string());

        let checkout_base_url: Url = get_env_default(
            "CHECKOUT_BASE_URL",
            "https://payment-provider.com/checkout".parse().unwrap(),
        );

        let idempotency_ttl_secs: u64 = get_env_default("IDEMPOTENCY_TTL_SECS", IDEMPOTENCY_TTL_SECS);

        Self {
            jwt_secret,
            token_ttl: Duration::seconds(token_ttl_secs),
            cors_origin,
            bind_addr,
            database_url,
            redis_url,
            checkout_base_url,
            idempotency_ttl_secs,
        }
    }
}
