use serde::Serialize;
use utoipa::ToSchema;

/// Overall service health as reported by `/healthcheck`.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Event store installed and answering.
    Ok,
    /// No event store is currently installed.
    Degraded,
}

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current health status.
    pub status: HealthStatus,
}

impl HealthResponse {
    /// Health response for an operational service.
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
        }
    }

    /// Health response for a service running without its store.
    pub fn degraded() -> Self {
        Self {
            status: HealthStatus::Degraded,
        }
    }
}
