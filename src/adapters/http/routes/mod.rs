pub mod subscription;
pub mod user;
pub mod webhook;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/v1/users", user::router())
        .nest("/v1/subscription", subscription::router())
        .nest("/v1/webhooks", webhook::router())
}
