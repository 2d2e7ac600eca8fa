pub mod memory;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::EventEntity;
use crate::dao::storage::StorageResult;
use crate::state::flake::{FlakePair, Slot};

/// How a request addresses an event: by its server-assigned id or by one of
/// the per-participant secret tokens. Both resolve to the same record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventHandle {
    /// Server-assigned identifier, used with an explicit email.
    Id(Uuid),
    /// Per-participant bearer token from a secret link.
    Token(String),
}

impl EventHandle {
    /// Classify a raw path parameter: anything that parses as a UUID is an
    /// id, everything else is treated as a token.
    pub fn from_path_param(raw: &str) -> Self {
        match Uuid::parse_str(raw) {
            Ok(id) => EventHandle::Id(id),
            Err(_) => EventHandle::Token(raw.to_owned()),
        }
    }
}

/// A record fetched from the store, along with the slot the addressing token
/// belongs to when the lookup went through a token.
#[derive(Debug, Clone)]
pub struct EventLookup {
    /// The stored record.
    pub entity: EventEntity,
    /// Slot owning the token used for the lookup; `None` for id lookups.
    pub token_slot: Option<Slot>,
}

/// Result of an atomic flake flip on one slot.
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    /// The record after the flip.
    pub entity: EventEntity,
    /// Both flags as they were immediately before the flip.
    pub before: FlakePair,
    /// Both flags immediately after the flip.
    pub after: FlakePair,
}

/// Abstraction over the persistence layer for event records.
///
/// `toggle_flaked` is the only mutation after insertion and must be atomic
/// per record: concurrent flips on different slots of the same event both
/// land, and concurrent flips on the same slot apply in some sequential
/// order. Unknown handles surface as `Ok(None)`, never as an error.
pub trait EventStore: Send + Sync {
    fn insert(&self, event: EventEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find(&self, handle: EventHandle) -> BoxFuture<'static, StorageResult<Option<EventLookup>>>;
    fn toggle_flaked(
        &self,
        id: Uuid,
        slot: Slot,
    ) -> BoxFuture<'static, StorageResult<Option<ToggleOutcome>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_path_param_is_an_id() {
        let id = Uuid::new_v4();
        assert_eq!(
            EventHandle::from_path_param(&id.to_string()),
            EventHandle::Id(id)
        );
    }

    #[test]
    fn opaque_path_param_is_a_token() {
        assert_eq!(
            EventHandle::from_path_param("u4OIhrs0sAtTxhMB"),
            EventHandle::Token("u4OIhrs0sAtTxhMB".into())
        );
    }
}
