//! Overtime service routes

use std::path::Path;

use axum::{
    Json, Router,
    extract::{
        Path as UrlPath, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    error::{ApiError, ApiResult},
    models::{CreateUserRequest, RecordQuery, SaveRecordRequest},
    state::AppState,
};

/// Create the router for the overtime service.
///
/// Paths outside the API are served from `static_dir`.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let api_routes = Router::new()
        .route("/overtime", get(get_record).post(save_record))
        .route("/users", post(create_user))
        .route("/users/:id", get(get_user));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Respond with the value, or with an empty object when there is none
fn found_or_empty<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => Json(json!({})).into_response(),
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "overtime",
                "store": "up"
            })),
        ),
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "service": "overtime",
                    "store": "down"
                })),
            )
        }
    }
}

/// Get the monthly record for a user
///
/// A query that cannot be turned into a key matches nothing.
pub async fn get_record(
    State(state): State<AppState>,
    query: Result<Query<RecordQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Some(key) = query.ok().and_then(|Query(query)| query.key()) else {
        return Ok(found_or_empty::<()>(None));
    };

    let record = state.service.get_record(&key).await?;
    Ok(found_or_empty(record))
}

/// Create or replace the monthly record for a user
pub async fn save_record(
    State(state): State<AppState>,
    payload: Result<Json<SaveRecordRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate().map_err(ApiError::BadRequest)?;

    let (key, entries, salary) = payload.into_parts();
    let response = state.service.save_record(key, entries, salary).await?;

    Ok(Json(response))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> ApiResult<Response> {
    let user = state.service.get_user(&id).await?;
    Ok(found_or_empty(user))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate().map_err(ApiError::BadRequest)?;

    let user = state
        .service
        .create_user(&payload.username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}
