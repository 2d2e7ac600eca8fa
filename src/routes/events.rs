use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::event::{
        CreateEventRequest, CreateEventResponse, StatusQuery, StatusResponse, ToggleRequest,
        ToggleResponse,
    },
    error::AppError,
    services::event_service,
    state::SharedState,
};

/// Routes covering the event lifecycle: creation, status reads, flake toggles.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/events", post(create_event))
        .route("/events/{handle}/status", get(event_status))
        .route("/events/{handle}/toggle", post(toggle_flake))
}

/// Create a new two-party event and mail both participants their secret link.
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = CreateEventResponse),
        (status = 400, description = "Missing or malformed creation fields")
    )
)]
pub async fn create_event(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateEventRequest>>,
) -> Result<(StatusCode, Json<CreateEventResponse>), AppError> {
    let created = event_service::create_event(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Current flake status of an event, as seen by the caller.
#[utoipa::path(
    get,
    path = "/events/{handle}/status",
    tag = "events",
    params(
        ("handle" = String, Path, description = "Event id or per-participant token"),
        StatusQuery,
    ),
    responses(
        (status = 200, description = "Current event status", body = StatusResponse),
        (status = 401, description = "Email matches neither participant"),
        (status = 404, description = "No such event")
    )
)]
pub async fn event_status(
    State(state): State<SharedState>,
    Path(handle): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    let status = event_service::event_status(&state, &handle, query.email.as_deref()).await?;
    Ok(Json(status))
}

/// Flip the caller's flake flag on an event.
#[utoipa::path(
    post,
    path = "/events/{handle}/toggle",
    tag = "events",
    request_body = ToggleRequest,
    params(("handle" = String, Path, description = "Event id or per-participant token")),
    responses(
        (status = 200, description = "Updated flake status", body = ToggleResponse),
        (status = 401, description = "Caller could not be resolved to a participant"),
        (status = 404, description = "No such event")
    )
)]
pub async fn toggle_flake(
    State(state): State<SharedState>,
    Path(handle): Path<String>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let updated = event_service::toggle_flake(&state, &handle, payload.email.as_deref()).await?;
    Ok(Json(updated))
}
