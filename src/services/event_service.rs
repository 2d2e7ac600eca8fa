//! Event lifecycle operations: create, status, toggle.
//!
//! This is the only module that composes identity resolution, the flake
//! state machine, the store, and the notification trigger. The notification
//! edge is computed by comparing the aggregate before and after the flip,
//! never from a stored flag, so a flake/un-flake/flake cycle re-notifies.

use std::time::Duration;

use futures::future::BoxFuture;
use rand::{Rng, distr::Alphanumeric};
use time::Date;
use tokio::time::sleep;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::{
        event_store::EventHandle,
        models::{EventEntity, ParticipantEntity},
        storage::StorageResult,
    },
    dto::{
        DATE_FORMAT,
        event::{CreateEventRequest, CreateEventResponse, StatusResponse, ToggleResponse},
        format_date_pretty,
    },
    error::ServiceError,
    services::{
        identity::resolve_slot,
        notifier::{EventNote, Invitation, spawn_delivery},
    },
    state::{
        SharedState,
        flake::{Slot, entered_both_flaked},
    },
};

/// Length of the per-participant secret tokens.
const TOKEN_LENGTH: usize = 48;
/// Upper bound on attempts for one store operation.
const MAX_STORE_ATTEMPTS: u32 = 3;
/// Pause between store retries.
const RETRY_DELAY: Duration = Duration::from_millis(100);

/// Create a new two-party event and send both participants their secret link.
pub async fn create_event(
    state: &SharedState,
    request: CreateEventRequest,
) -> Result<CreateEventResponse, ServiceError> {
    request.validate()?;

    // The date string passed derive validation, so this parse cannot fail.
    let date = Date::parse(&request.date, &DATE_FORMAT)
        .map_err(|err| ServiceError::InvalidInput(format!("invalid date: {err}")))?;

    let entity = EventEntity {
        id: Uuid::new_v4(),
        date,
        description: request.description,
        participants: [
            ParticipantEntity {
                email: request.email1,
                token: generate_token(),
                flaked: false,
            },
            ParticipantEntity {
                email: request.email2,
                token: generate_token(),
                flaked: false,
            },
        ],
    };

    let store = state.require_event_store().await?;
    with_store_retry(|| store.insert(entity.clone()), "insert event").await?;
    debug!(event_id = %entity.id, "event created");

    let config = state.config();
    let invitations = entity
        .participants
        .iter()
        .map(|participant| Invitation {
            to: participant.email.clone(),
            link: config.secret_link(&participant.token),
        })
        .collect();
    spawn_delivery(
        state.notifier().invitations(note_for(&entity), invitations),
        "invitations",
    );

    Ok(CreateEventResponse {
        event_id: entity.id,
        secret_link1: config.secret_link(&entity.participants[0].token),
        secret_link2: config.secret_link(&entity.participants[1].token),
    })
}

/// Read an event's status as seen by the caller. Never has side effects:
/// observing an already mutually-flaked event notifies nobody.
pub async fn event_status(
    state: &SharedState,
    raw_handle: &str,
    email: Option<&str>,
) -> Result<StatusResponse, ServiceError> {
    let store = state.require_event_store().await?;
    let handle = EventHandle::from_path_param(raw_handle);

    let Some(lookup) = with_store_retry(|| store.find(handle.clone()), "find event").await? else {
        return Err(ServiceError::NotFound(format!(
            "no event for `{raw_handle}`"
        )));
    };

    let viewer = resolve_slot(
        &lookup.entity,
        lookup.token_slot,
        email,
        state.config().identity_mode,
    )?;

    Ok(StatusResponse {
        flake_status: lookup.entity.flags().into(),
        is_user1: viewer == Some(Slot::First),
        is_user2: viewer == Some(Slot::Second),
        event_details: (&lookup.entity).into(),
    })
}

/// Flip the caller's flake flag and fire the notification edge.
pub async fn toggle_flake(
    state: &SharedState,
    raw_handle: &str,
    email: Option<&str>,
) -> Result<ToggleResponse, ServiceError> {
    let store = state.require_event_store().await?;
    let handle = EventHandle::from_path_param(raw_handle);

    let Some(lookup) = with_store_retry(|| store.find(handle.clone()), "find event").await? else {
        return Err(ServiceError::NotFound(format!(
            "no event for `{raw_handle}`"
        )));
    };

    let slot = resolve_slot(
        &lookup.entity,
        lookup.token_slot,
        email,
        state.config().identity_mode,
    )?
    .ok_or_else(|| {
        ServiceError::Unauthorized("cannot tell which participant is toggling".into())
    })?;

    let id = lookup.entity.id;
    let Some(outcome) =
        with_store_retry(|| store.toggle_flaked(id, slot), "toggle flake").await?
    else {
        // The record vanished between lookup and flip (administrative purge).
        return Err(ServiceError::NotFound(format!(
            "no event for `{raw_handle}`"
        )));
    };

    let note = note_for(&outcome.entity);
    if entered_both_flaked(outcome.before.aggregate(), outcome.after.aggregate()) {
        debug!(event_id = %id, "both participants flaked");
        let recipients = [
            outcome.entity.participant(Slot::First).email.clone(),
            outcome.entity.participant(Slot::Second).email.clone(),
        ];
        spawn_delivery(
            state.notifier().both_flaked(note, recipients),
            "both-flaked notice",
        );
    } else {
        let other = outcome.entity.participant(slot.other()).email.clone();
        spawn_delivery(
            state.notifier().flake_changed(note, other),
            "flake-changed notice",
        );
    }

    Ok(ToggleResponse {
        flake_status: outcome.after.into(),
    })
}

fn note_for(entity: &EventEntity) -> EventNote {
    EventNote {
        date: format_date_pretty(entity.date),
        description: entity.description.clone(),
    }
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Run one store operation, retrying transient failures a bounded number of
/// times before surfacing the error.
async fn with_store_retry<T, F>(mut op: F, context: &'static str) -> Result<T, ServiceError>
where
    F: FnMut() -> BoxFuture<'static, StorageResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < MAX_STORE_ATTEMPTS => {
                attempt += 1;
                warn!(attempt, context, error = %err, "transient store failure; retrying");
                sleep(RETRY_DELAY).await;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
