use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the FlakeDate backend.
#[openapi(
    paths(
        crate::routes::events::create_event,
        crate::routes::events::event_status,
        crate::routes::events::toggle_flake,
        crate::routes::health::healthcheck,
    ),
    components(
        schemas(
            crate::dto::event::CreateEventRequest,
            crate::dto::event::CreateEventResponse,
            crate::dto::event::ToggleRequest,
            crate::dto::event::ToggleResponse,
            crate::dto::event::StatusResponse,
            crate::dto::event::FlakeStatusDto,
            crate::dto::event::EventDetailsDto,
            crate::dto::health::HealthResponse,
        )
    ),
    tags(
        (name = "events", description = "Two-party event lifecycle and flake toggles"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
