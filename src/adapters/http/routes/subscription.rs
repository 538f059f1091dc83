use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, middleware::bearer_user_id},
    app_error::AppResult,
};

#[derive(Deserialize)]
struct InitiatePayload {
    plan_id: String,
}

#[derive(Serialize)]
struct InitiateResponse {
    subscription_id: Uuid,
    payment_intent_id: String,
    payment_url: String,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    current_period_end: Option<i64>,
    plan_id: String,
    plan_name: String,
}

#[derive(Deserialize)]
struct CancelPayload {
    effective_date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct CancelResponse {
    status: String,
    message: String,
    effective_date: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plan", get(get_plan))
        .route("/initiate", post(initiate))
        .route("/status", get(status))
        .route("/cancel", post(cancel))
}

/// GET /api/v1/subscription/plan
async fn get_plan(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(app_state.subscription_use_cases.plan().clone()))
}

/// POST /api/v1/subscription/initiate
/// Creates a pending subscription and returns the checkout handle. Returns
/// 202: activation happens later, when the provider's webhook arrives.
async fn initiate(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<InitiatePayload>,
) -> AppResult<impl IntoResponse> {
    let user_id = bearer_user_id(&headers, &app_state)?;

    let result = app_state
        .subscription_use_cases
        .initiate(user_id, &payload.plan_id)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(InitiateResponse {
            subscription_id: result.subscription_id,
            payment_intent_id: result.payment_intent_id,
            payment_url: result.payment_url,
        }),
    ))
}

/// GET /api/v1/subscription/status
async fn status(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user_id = bearer_user_id(&headers, &app_state)?;

    let view = app_state.subscription_use_cases.status(user_id).await?;

    Ok(Json(StatusResponse {
        status: view.status.as_str().to_string(),
        current_period_end: view.current_period_end.map(|dt| dt.and_utc().timestamp()),
        plan_id: view.plan_id,
        plan_name: view.plan_name,
    }))
}

/// POST /api/v1/subscription/cancel
async fn cancel(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CancelPayload>,
) -> AppResult<impl IntoResponse> {
    let user_id = bearer_user_id(&headers, &app_state)?;

    let result = app_state
        .subscription_use_cases
        .cancel(user_id, payload.effective_date)
        .await?;

    Ok(Json(CancelResponse {
        status: result.status.as_str().to_string(),
        message: result.message,
        effective_date: result.effective_date.and_utc().timestamp(),
    }))
}
