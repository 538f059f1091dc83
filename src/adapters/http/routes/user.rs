use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    adapters::http::{app_state::AppState, middleware::bearer_user_id},
    app_error::{AppError, AppResult},
    application::validators::{is_valid_email, is_valid_name, is_valid_password},
};

#[derive(Deserialize)]
struct RegisterPayload {
    email: String,
    password: String,
    name: Option<String>,
}

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
}

async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    if !is_valid_email(&payload.email) {
        return Err(AppError::InvalidInput("Valid email is required".into()));
    }
    if !is_valid_password(&payload.password) {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters long".into(),
        ));
    }
    if let Some(name) = payload.name.as_deref()
        && !is_valid_name(name)
    {
        return Err(AppError::InvalidInput(
            "Name must be at least 2 characters long".into(),
        ));
    }

    app_state
        .auth_use_cases
        .register(&payload.email, &payload.password, payload.name.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "User registered successfully" })),
    ))
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    if !is_valid_email(&payload.email) {
        return Err(AppError::InvalidInput("Valid email is required".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::InvalidInput("Password is required".into()));
    }

    let token = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(serde_json::json!({ "token": token })))
}

async fn profile(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let user_id = bearer_user_id(&headers, &app_state)?;
    let profile = app_state.auth_use_cases.profile(user_id).await?;
    Ok(Json(profile))
}
