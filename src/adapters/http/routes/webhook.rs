//! Payment-provider webhook ingress.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    domain::entities::payment_event::PaymentEvent,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/payment", post(handle_payment_webhook))
}

/// POST /api/v1/webhooks/payment
///
/// Acknowledges every well-formed event with `{"received": true}`, including
/// types we do not act on and events we cannot correlate — returning an
/// error would only trigger provider retry storms. Only a malformed payload
/// is rejected, before any state is touched.
async fn handle_payment_webhook(
    State(app_state): State<AppState>,
    body: String,
) -> AppResult<impl IntoResponse> {
    let event: PaymentEvent = serde_json::from_str(&body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid webhook payload: {e}")))?;

    app_state
        .subscription_use_cases
        .reconcile_payment_event(&event)
        .await?;

    Ok(Json(serde_json::json!({ "received": true })))
}
