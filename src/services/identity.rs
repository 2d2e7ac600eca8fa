//! Resolves a request's credential (email and/or token) to a participant slot.
//!
//! Resolution is a pure classification over a read snapshot; it never mutates
//! state. Email takes precedence over the token's slot when both are present
//! and disagree, and matching is case-insensitive.

use crate::{
    config::IdentityMode, dao::models::EventEntity, error::ServiceError, state::flake::Slot,
};

/// Match an email against both stored participant addresses.
fn email_slot(entity: &EventEntity, email: &str) -> Option<Slot> {
    let email = email.trim();
    if entity
        .participant(Slot::First)
        .email
        .eq_ignore_ascii_case(email)
    {
        Some(Slot::First)
    } else if entity
        .participant(Slot::Second)
        .email
        .eq_ignore_ascii_case(email)
    {
        Some(Slot::Second)
    } else {
        None
    }
}

/// Resolve the caller's slot within `entity`.
///
/// `token_slot` is the slot owning the token the event was addressed by, if
/// any. Returns `Ok(None)` when the caller is anonymous but still allowed to
/// look (id-addressed status read in link-only mode); callers that need a
/// definite slot treat `None` as unauthorized.
pub fn resolve_slot(
    entity: &EventEntity,
    token_slot: Option<Slot>,
    email: Option<&str>,
    mode: IdentityMode,
) -> Result<Option<Slot>, ServiceError> {
    if let Some(email) = email.map(str::trim).filter(|email| !email.is_empty()) {
        return match email_slot(entity, email) {
            Some(slot) => Ok(Some(slot)),
            None => Err(ServiceError::Unauthorized(
                "email does not match either participant".into(),
            )),
        };
    }

    match mode {
        IdentityMode::LinkOnly => Ok(token_slot),
        IdentityMode::EmailRequired => Err(ServiceError::Unauthorized(
            "a participant email is required".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use uuid::Uuid;

    use super::*;
    use crate::dao::models::ParticipantEntity;

    fn entity() -> EventEntity {
        EventEntity {
            id: Uuid::new_v4(),
            date: date!(2024 - 06 - 01),
            description: "Coffee".into(),
            participants: [
                ParticipantEntity {
                    email: "a@x.com".into(),
                    token: "tok-a".into(),
                    flaked: false,
                },
                ParticipantEntity {
                    email: "b@x.com".into(),
                    token: "tok-b".into(),
                    flaked: false,
                },
            ],
        }
    }

    #[test]
    fn email_matches_case_insensitively() {
        let entity = entity();
        let slot = resolve_slot(&entity, None, Some("A@X.COM"), IdentityMode::LinkOnly).unwrap();
        assert_eq!(slot, Some(Slot::First));
    }

    #[test]
    fn email_overrides_token_slot_on_disagreement() {
        let entity = entity();
        let slot = resolve_slot(
            &entity,
            Some(Slot::First),
            Some("b@x.com"),
            IdentityMode::LinkOnly,
        )
        .unwrap();
        assert_eq!(slot, Some(Slot::Second));
    }

    #[test]
    fn unknown_email_is_unauthorized_even_with_a_valid_token() {
        let entity = entity();
        let err = resolve_slot(
            &entity,
            Some(Slot::First),
            Some("stranger@x.com"),
            IdentityMode::LinkOnly,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn token_alone_resolves_in_link_only_mode() {
        let entity = entity();
        let slot = resolve_slot(&entity, Some(Slot::Second), None, IdentityMode::LinkOnly).unwrap();
        assert_eq!(slot, Some(Slot::Second));
    }

    #[test]
    fn token_alone_is_rejected_when_email_is_required() {
        let entity = entity();
        let err = resolve_slot(
            &entity,
            Some(Slot::Second),
            None,
            IdentityMode::EmailRequired,
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn anonymous_id_lookup_resolves_to_no_slot() {
        let entity = entity();
        let slot = resolve_slot(&entity, None, None, IdentityMode::LinkOnly).unwrap();
        assert_eq!(slot, None);
    }

    #[test]
    fn blank_email_is_treated_as_absent() {
        let entity = entity();
        let slot = resolve_slot(&entity, Some(Slot::First), Some("  "), IdentityMode::LinkOnly)
            .unwrap();
        assert_eq!(slot, Some(Slot::First));
    }
}
