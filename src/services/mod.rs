/// OpenAPI documentation generation.
pub mod documentation;
/// Core event lifecycle: create, status, toggle.
pub mod event_service;
/// Health check service.
pub mod health_service;
/// Participant identity resolution.
pub mod identity;
/// Notification collaborator invoked on flake edges.
pub mod notifier;
