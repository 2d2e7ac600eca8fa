use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::EventEntity,
    dto::{format_date, validation::validate_event_date},
    state::flake::FlakePair,
};

/// Payload used to propose a brand-new event between two people.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateEventRequest {
    /// Calendar date of the event, `YYYY-MM-DD`.
    #[validate(custom(function = validate_event_date))]
    pub date: String,
    /// What the event is about.
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    /// Creator's email address (first participant).
    #[validate(email)]
    pub email1: String,
    /// Invitee's email address (second participant).
    #[validate(email)]
    pub email2: String,
}

/// Response returned once an event has been created.
///
/// The secret links embed the per-participant tokens; each participant gets
/// exactly one and must not share it with the other.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    /// Server-assigned event identifier.
    pub event_id: Uuid,
    /// Secret management link for the first participant.
    pub secret_link1: String,
    /// Secret management link for the second participant.
    pub secret_link2: String,
}

/// Optional email accompanying a status read.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Caller's email; when present it selects the caller's slot and must
    /// match one of the two participants.
    pub email: Option<String>,
}

/// Body of a toggle request.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ToggleRequest {
    /// Caller's email; optional when the event is addressed by a
    /// per-participant token.
    #[serde(default)]
    pub email: Option<String>,
}

/// The two flake flags as exposed to clients.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct FlakeStatusDto {
    /// First participant's flag.
    pub user1: bool,
    /// Second participant's flag.
    pub user2: bool,
}

impl From<FlakePair> for FlakeStatusDto {
    fn from(pair: FlakePair) -> Self {
        Self {
            user1: pair.first,
            user2: pair.second,
        }
    }
}

/// Immutable event details echoed back on status reads.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetailsDto {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Event description.
    pub description: String,
}

impl From<&EventEntity> for EventDetailsDto {
    fn from(entity: &EventEntity) -> Self {
        Self {
            date: format_date(entity.date),
            description: entity.description.clone(),
        }
    }
}

/// Full status projection of an event for one viewer.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Current flake flags of both participants.
    pub flake_status: FlakeStatusDto,
    /// Whether the viewer was resolved to the first slot.
    pub is_user1: bool,
    /// Whether the viewer was resolved to the second slot.
    pub is_user2: bool,
    /// Immutable event details.
    pub event_details: EventDetailsDto,
}

/// Updated flake flags returned after a toggle.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    /// Current flake flags of both participants.
    pub flake_status: FlakeStatusDto,
}
