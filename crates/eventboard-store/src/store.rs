//! The [`EntityStore`]: four independent record collections.
//!
//! The store only holds records. It never checks that a foreign key points
//! at an existing record and never publishes change notifications; both
//! belong to the layer above.

use eventboard_types::{Entity, EntityKind, Event, Location, Participant, User};

use crate::collection::Collection;
use crate::resolve::Resolver;

/// All records held in process memory.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    users: Collection<User>,
    locations: Collection<Location>,
    events: Collection<Event>,
    participants: Collection<Participant>,
}

impl EntityStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            users: Collection::new(),
            locations: Collection::new(),
            events: Collection::new(),
            participants: Collection::new(),
        }
    }

    /// The user collection.
    pub const fn users(&self) -> &Collection<User> {
        &self.users
    }

    /// The location collection.
    pub const fn locations(&self) -> &Collection<Location> {
        &self.locations
    }

    /// The event collection.
    pub const fn events(&self) -> &Collection<Event> {
        &self.events
    }

    /// The participant collection.
    pub const fn participants(&self) -> &Collection<Participant> {
        &self.participants
    }

    /// The collection holding records of kind `E`.
    pub fn collection<E: Stored>(&self) -> &Collection<E> {
        E::collection(self)
    }

    /// Mutable access to the collection holding records of kind `E`.
    pub fn collection_mut<E: Stored>(&mut self) -> &mut Collection<E> {
        E::collection_mut(self)
    }

    /// Number of records in the collection for `kind`.
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::User => self.users.len(),
            EntityKind::Location => self.locations.len(),
            EntityKind::Event => self.events.len(),
            EntityKind::Participant => self.participants.len(),
        }
    }

    /// Relationship resolver over this store's current contents.
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }
}

/// A record kind that has a collection in the [`EntityStore`].
pub trait Stored: Entity {
    /// Borrow this kind's collection.
    fn collection(store: &EntityStore) -> &Collection<Self>;

    /// Mutably borrow this kind's collection.
    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self>;
}

impl Stored for User {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.users
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.users
    }
}

impl Stored for Location {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.locations
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.locations
    }
}

impl Stored for Event {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.events
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.events
    }
}

impl Stored for Participant {
    fn collection(store: &EntityStore) -> &Collection<Self> {
        &store.participants
    }

    fn collection_mut(store: &mut EntityStore) -> &mut Collection<Self> {
        &mut store.participants
    }
}

#[cfg(test)]
mod tests {
    use eventboard_types::{EventId, ParticipantId, UserId};

    use super::*;

    #[test]
    fn collections_are_independent() {
        let mut store = EntityStore::new();
        let _ = store.collection_mut::<User>().insert(User {
            id: UserId::from("x"),
            username: String::from("ada"),
            email: None,
        });
        let _ = store.collection_mut::<Participant>().insert(Participant {
            id: ParticipantId::from("x"),
            event_id: EventId::from("e"),
            user_id: UserId::from("x"),
        });

        assert_eq!(store.count(EntityKind::User), 1);
        assert_eq!(store.count(EntityKind::Participant), 1);
        assert_eq!(store.count(EntityKind::Event), 0);
        assert_eq!(store.users().len(), store.collection::<User>().len());
    }

    #[test]
    fn same_id_allowed_across_collections() {
        let mut store = EntityStore::new();
        let user = store.collection_mut::<User>().insert(User {
            id: UserId::from("shared"),
            username: String::from("u"),
            email: None,
        });
        let participant = store.collection_mut::<Participant>().insert(Participant {
            id: ParticipantId::from("shared"),
            event_id: EventId::from("e"),
            user_id: UserId::from("shared"),
        });
        assert!(user.is_ok());
        assert!(participant.is_ok());
    }
}
