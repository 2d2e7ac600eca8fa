//! In-process event store backed by concurrent maps.
//!
//! `DashMap` entry locks serialize mutations per record, which is exactly the
//! single-writer-per-event discipline the toggle contract requires. Unknown
//! handles are reported as `Ok(None)`; this backend has no transient failure
//! mode.

use std::sync::Arc;

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::event_store::{EventHandle, EventLookup, EventStore, ToggleOutcome};
use crate::dao::models::EventEntity;
use crate::dao::storage::StorageResult;
use crate::state::flake::Slot;

/// Event store keeping every record in process memory.
#[derive(Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<DashMap<Uuid, EventEntity>>,
    // Token index: every participant token maps back to its record and slot.
    tokens: Arc<DashMap<String, (Uuid, Slot)>>,
}

impl MemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, handle: EventHandle) -> Option<EventLookup> {
        match handle {
            EventHandle::Id(id) => self.events.get(&id).map(|entry| EventLookup {
                entity: entry.clone(),
                token_slot: None,
            }),
            EventHandle::Token(token) => {
                let (id, slot) = *self.tokens.get(&token)?;
                self.events.get(&id).map(|entry| EventLookup {
                    entity: entry.clone(),
                    token_slot: Some(slot),
                })
            }
        }
    }

    fn flip(&self, id: Uuid, slot: Slot) -> Option<ToggleOutcome> {
        // The entry guard holds the shard lock for the whole read-modify-write.
        let mut entry = self.events.get_mut(&id)?;
        let before = entry.flags();
        let participant = entry.participant_mut(slot);
        participant.flaked = !participant.flaked;
        let after = entry.flags();

        Some(ToggleOutcome {
            entity: entry.clone(),
            before,
            after,
        })
    }
}

impl EventStore for MemoryEventStore {
    fn insert(&self, event: EventEntity) -> BoxFuture<'static, StorageResult<()>> {
        for (index, participant) in event.participants.iter().enumerate() {
            let slot = if index == 0 { Slot::First } else { Slot::Second };
            self.tokens
                .insert(participant.token.clone(), (event.id, slot));
        }
        self.events.insert(event.id, event);

        futures::future::ready(Ok(())).boxed()
    }

    fn find(&self, handle: EventHandle) -> BoxFuture<'static, StorageResult<Option<EventLookup>>> {
        futures::future::ready(Ok(self.lookup(handle))).boxed()
    }

    fn toggle_flaked(
        &self,
        id: Uuid,
        slot: Slot,
    ) -> BoxFuture<'static, StorageResult<Option<ToggleOutcome>>> {
        futures::future::ready(Ok(self.flip(id, slot))).boxed()
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        futures::future::ready(Ok(())).boxed()
    }
}
