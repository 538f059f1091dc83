use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt,
    application::use_cases::idempotency::StoredResponse,
};

/// Upper bound on a response body the guard will buffer for replay.
const MAX_CACHED_BODY_BYTES: usize = 64 * 1024;

/// Deduplicates mutating requests that carry an `Idempotency-Key` header.
///
/// A stored, unexpired response for the key is replayed without running the
/// handler, guaranteeing at-most-once side effects per key for retried
/// clients. On a miss the handler runs; only success-class responses are
/// stored, so failures remain retryable under the same key. Reads and
/// keyless requests pass through untouched.
///
/// Two concurrent requests with a fresh key can both miss the lookup and
/// both execute; the storage-level uniqueness constraints behind the
/// handlers are the correctness backstop. This guard is a response cache,
/// not a lock.
pub async fn idempotency_middleware(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let Some(key) = request
        .headers()
        .get("idempotency-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    else {
        return Ok(next.run(request).await);
    };

    if let Some(stored) = app_state.idempotency_store.get(&key).await? {
        tracing::debug!(idempotency_key = %key, "Replaying stored response");
        return Ok(replay_response(stored));
    }

    let response = next.run(request).await;
    if !response.status().is_success() {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_CACHED_BODY_BYTES)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to buffer response body: {e}")))?;

    let stored = StoredResponse {
        status: parts.status.as_u16(),
        body: bytes.to_vec(),
    };
    if let Err(e) = app_state
        .idempotency_store
        .put(&key, &stored, app_state.config.idempotency_ttl_secs)
        .await
    {
        // Never turn a completed operation into a failure; the client just
        // loses replay protection for this key.
        tracing::error!(
            error = %e,
            idempotency_key = %key,
            "Failed to store idempotency record"
        );
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

fn replay_response(stored: StoredResponse) -> Response {
    let mut response = Response::new(Body::from(stored.body));
    *response.status_mut() = StatusCode::from_u16(stored.status).unwrap_or(StatusCode::OK);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Extracts the authenticated user from an `Authorization: Bearer` header.
/// Absence or an invalid token surfaces as 401 at the boundary; handlers
/// only ever see an authenticated user id.
pub fn bearer_user_id(headers: &HeaderMap, app_state: &AppState) -> AppResult<Uuid> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidCredentials)?;

    let claims = jwt::verify(token, &app_state.config.jwt_secret)?;
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidCredentials)
}
