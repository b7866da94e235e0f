//! Relationship resolution.
//!
//! Related records are never stored inline. Each accessor here scans the
//! related collection for a matching foreign key, so every call costs
//! O(size of that collection). A foreign key that points at nothing
//! (unset, or the target was deleted) resolves to `None` or to an empty
//! list; it is never an error.

use eventboard_types::{Event, Location, Participant, User};

use crate::store::EntityStore;

/// Read-only view answering "what is related to this record" queries.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a EntityStore,
}

impl<'a> Resolver<'a> {
    /// Resolve against the given store.
    pub const fn new(store: &'a EntityStore) -> Self {
        Self { store }
    }

    /// The location an event takes place at.
    pub fn event_location(&self, event: &Event) -> Option<&'a Location> {
        let location_id = event.location_id.as_ref()?;
        self.store
            .locations()
            .list()
            .iter()
            .find(|location| &location.id == location_id)
    }

    /// The user organizing an event.
    pub fn event_user(&self, event: &Event) -> Option<&'a User> {
        let user_id = event.user_id.as_ref()?;
        self.store
            .users()
            .list()
            .iter()
            .find(|user| &user.id == user_id)
    }

    /// Every participant record attached to an event, in insertion order.
    pub fn event_participants(&self, event: &Event) -> Vec<&'a Participant> {
        self.store
            .participants()
            .list()
            .iter()
            .filter(|participant| participant.event_id == event.id)
            .collect()
    }

    /// Every event a user organizes, in insertion order.
    pub fn user_events(&self, user: &User) -> Vec<&'a Event> {
        self.store
            .events()
            .list()
            .iter()
            .filter(|event| event.user_id.as_ref() == Some(&user.id))
            .collect()
    }

    /// The event a participant attends.
    pub fn participant_event(&self, participant: &Participant) -> Option<&'a Event> {
        self.store
            .events()
            .list()
            .iter()
            .find(|event| event.id == participant.event_id)
    }

    /// The user a participant record belongs to.
    pub fn participant_user(&self, participant: &Participant) -> Option<&'a User> {
        self.store
            .users()
            .list()
            .iter()
            .find(|user| user.id == participant.user_id)
    }
}
