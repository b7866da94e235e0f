//! The mutation engine: the only writer of the [`EntityStore`].
//!
//! Every operation applies its change to the store and publishes the
//! matching [`Change`](eventboard_types::Change) before returning. The
//! engine holds exclusive access to the store for its whole lifetime, so
//! nothing can read the store between a write and its notification.
//!
//! Foreign keys are taken as given. Deletes do not cascade: removing a
//! user or event leaves any records that reference it in place.

use std::ops::DerefMut;

use eventboard_store::{EntityStore, Stored};
use eventboard_types::{
    ChangeKind, Event, EventId, EventUpdate, Location, LocationId, LocationUpdate, NewEvent,
    NewLocation, NewParticipant, NewUser, Participant, ParticipantId, ParticipantUpdate,
    RecordId, User, UserId, UserUpdate,
};
use tracing::{debug, info};

use crate::error::MutationError;
use crate::notifier::ChangeNotifier;
use crate::patch::ApplyPatch;

/// Applies create, update, and delete operations and publishes their
/// results.
///
/// `S` is anything that gives exclusive access to an [`EntityStore`]: a
/// plain `&mut EntityStore`, or the write guard handed out by
/// [`Board::mutations`](crate::board::Board::mutations).
#[derive(Debug)]
pub struct MutationEngine<'n, S> {
    store: S,
    notifier: &'n ChangeNotifier,
}

impl<'n, S> MutationEngine<'n, S>
where
    S: DerefMut<Target = EntityStore>,
{
    /// Wrap exclusive store access together with the notifier to publish
    /// on.
    pub const fn new(store: S, notifier: &'n ChangeNotifier) -> Self {
        Self { store, notifier }
    }

    /// Read access to the store as it stands mid-transaction.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    // -------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------

    /// Create a user from a username and optional email.
    ///
    /// # Errors
    ///
    /// Only fails if the store rejects the insert, which a freshly
    /// generated identifier never triggers.
    pub fn create_user(&mut self, input: NewUser) -> Result<User, MutationError> {
        self.create(|id| User {
            id,
            username: input.username,
            email: input.email,
        })
    }

    /// Merge a patch into an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if no user has `update.id`.
    pub fn update_user(&mut self, update: UserUpdate) -> Result<User, MutationError> {
        self.update(&update.id, update.patch)
    }

    /// Delete one user. Events they organize and their participant
    /// records are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if no user has `id`.
    pub fn delete_user(&mut self, id: &UserId) -> Result<User, MutationError> {
        self.delete(id)
    }

    /// Delete every user, returning how many were removed.
    pub fn delete_all_users(&mut self) -> usize {
        self.delete_all::<User>()
    }

    // -------------------------------------------------------------------
    // Locations
    // -------------------------------------------------------------------

    /// Create a location from a name and description. Coordinates start
    /// unset.
    ///
    /// # Errors
    ///
    /// Only fails if the store rejects the insert, which a freshly
    /// generated identifier never triggers.
    pub fn create_location(&mut self, input: NewLocation) -> Result<Location, MutationError> {
        self.create(|id| Location {
            id,
            name: input.name,
            desc: input.desc,
            lat: None,
            lng: None,
        })
    }

    /// Merge a patch into an existing location.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if no location has `update.id`.
    pub fn update_location(&mut self, update: LocationUpdate) -> Result<Location, MutationError> {
        self.update(&update.id, update.patch)
    }

    /// Delete one location. Events that reference it keep their
    /// `location_id`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if no location has `id`.
    pub fn delete_location(&mut self, id: &LocationId) -> Result<Location, MutationError> {
        self.delete(id)
    }

    /// Delete every location, returning how many were removed.
    pub fn delete_all_locations(&mut self) -> usize {
        self.delete_all::<Location>()
    }

    // -------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------

    /// Create an event from a title, description, and date. Times,
    /// location, and organizer start unset.
    ///
    /// # Errors
    ///
    /// Only fails if the store rejects the insert, which a freshly
    /// generated identifier never triggers.
    pub fn create_event(&mut self, input: NewEvent) -> Result<Event, MutationError> {
        self.create(|id| Event {
            id,
            title: input.title,
            desc: input.desc,
            date: input.date,
            from: None,
            to: None,
            location_id: None,
            user_id: None,
        })
    }

    /// Merge a patch into an existing event.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if no event has `update.id`.
    pub fn update_event(&mut self, update: EventUpdate) -> Result<Event, MutationError> {
        self.update(&update.id, update.patch)
    }

    /// Delete one event. Its participant records are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if no event has `id`.
    pub fn delete_event(&mut self, id: &EventId) -> Result<Event, MutationError> {
        self.delete(id)
    }

    /// Delete every event, returning how many were removed.
    pub fn delete_all_events(&mut self) -> usize {
        self.delete_all::<Event>()
    }

    // -------------------------------------------------------------------
    // Participants
    // -------------------------------------------------------------------

    /// Record a user's attendance at an event. Neither reference is
    /// checked, and the same pair may be recorded more than once.
    ///
    /// # Errors
    ///
    /// Only fails if the store rejects the insert, which a freshly
    /// generated identifier never triggers.
    pub fn create_participant(
        &mut self,
        input: NewParticipant,
    ) -> Result<Participant, MutationError> {
        self.create(|id| Participant {
            id,
            event_id: input.event_id,
            user_id: input.user_id,
        })
    }

    /// Merge a patch into an existing participant record.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if no participant has
    /// `update.id`.
    pub fn update_participant(
        &mut self,
        update: ParticipantUpdate,
    ) -> Result<Participant, MutationError> {
        self.update(&update.id, update.patch)
    }

    /// Delete one participant record.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if no participant has `id`.
    pub fn delete_participant(
        &mut self,
        id: &ParticipantId,
    ) -> Result<Participant, MutationError> {
        self.delete(id)
    }

    /// Delete every participant record, returning how many were removed.
    pub fn delete_all_participants(&mut self) -> usize {
        self.delete_all::<Participant>()
    }

    // -------------------------------------------------------------------
    // Generic operations
    // -------------------------------------------------------------------

    fn fresh_id<E: Stored>(&self) -> E::Id {
        loop {
            let id = E::Id::generate();
            if !self.store.collection::<E>().contains(&id) {
                return id;
            }
        }
    }

    fn create<E: Stored>(&mut self, build: impl FnOnce(E::Id) -> E) -> Result<E, MutationError> {
        let record = build(self.fresh_id::<E>());
        self.store.collection_mut::<E>().insert(record.clone())?;
        debug!(entity = %E::KIND, id = %record.id(), "record created");
        self.notifier
            .publish_entity(ChangeKind::Created, record.clone());
        Ok(record)
    }

    fn update<E>(&mut self, id: &E::Id, patch: E::Patch) -> Result<E, MutationError>
    where
        E: Stored + ApplyPatch,
    {
        let collection = self.store.collection_mut::<E>();
        let mut record = collection
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| MutationError::not_found::<E>(id))?;
        record.apply_patch(patch);
        let stored = collection
            .replace_at(id, record)
            .cloned()
            .ok_or_else(|| MutationError::not_found::<E>(id))?;
        debug!(entity = %E::KIND, %id, "record updated");
        self.notifier
            .publish_entity(ChangeKind::Updated, stored.clone());
        Ok(stored)
    }

    fn delete<E: Stored>(&mut self, id: &E::Id) -> Result<E, MutationError> {
        let removed = self
            .store
            .collection_mut::<E>()
            .remove_by_id(id)
            .ok_or_else(|| MutationError::not_found::<E>(id))?;
        debug!(entity = %E::KIND, %id, "record deleted");
        self.notifier
            .publish_entity(ChangeKind::Deleted, removed.clone());
        Ok(removed)
    }

    fn delete_all<E: Stored>(&mut self) -> usize {
        let removed = self.store.collection_mut::<E>().remove_all();
        info!(entity = %E::KIND, removed, "collection cleared");
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eventboard_types::{
        EntityKind, EventPatch, LocationPatch, ParticipantPatch, Patch, Topic, UserPatch,
    };

    use super::*;

    fn new_event() -> NewEvent {
        NewEvent {
            title: String::from("Meetup"),
            desc: String::from("d"),
            date: String::from("2024-01-01"),
        }
    }

    fn new_location() -> NewLocation {
        NewLocation {
            name: String::from("Hall"),
            desc: String::from("Main hall"),
        }
    }

    #[test]
    fn created_record_is_findable_and_published_once() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut created = notifier.subscribe_to::<User>(ChangeKind::Created);
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let user = engine
            .create_user(NewUser {
                username: String::from("ada"),
                email: None,
            })
            .unwrap();

        assert_eq!(engine.store().users().find_by_id(&user.id), Some(&user));
        assert_eq!(created.try_recv(), Some(user));
        assert!(created.try_recv().is_none());
    }

    #[test]
    fn create_sets_only_input_fields() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let location = engine.create_location(new_location()).unwrap();
        assert_eq!(location.name, "Hall");
        assert_eq!(location.desc, "Main hall");
        assert!(location.lat.is_none());
        assert!(location.lng.is_none());

        let event = engine.create_event(new_event()).unwrap();
        assert!(event.from.is_none());
        assert!(event.to.is_none());
        assert!(event.location_id.is_none());
        assert!(event.user_id.is_none());
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let a = engine.create_event(new_event()).unwrap();
        let b = engine.create_event(new_event()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(engine.store().events().len(), 2);
    }

    #[test]
    fn update_merges_and_keeps_position() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut updated = notifier.subscribe_to::<Event>(ChangeKind::Updated);
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let first = engine.create_event(new_event()).unwrap();
        let second = engine.create_event(new_event()).unwrap();

        let merged = engine
            .update_event(EventUpdate {
                id: first.id.clone(),
                patch: EventPatch {
                    title: Some(String::from("X")),
                    ..EventPatch::default()
                },
            })
            .unwrap();

        assert_eq!(merged.title, "X");
        assert_eq!(merged.desc, "d");
        assert_eq!(merged.id, first.id);

        let order: Vec<&EventId> = engine.store().events().list().iter().map(|e| &e.id).collect();
        assert_eq!(order, vec![&first.id, &second.id]);
        assert_eq!(updated.try_recv(), Some(merged));
    }

    #[test]
    fn update_is_idempotent() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);
        let event = engine.create_event(new_event()).unwrap();

        let update = EventUpdate {
            id: event.id,
            patch: EventPatch {
                title: Some(String::from("X")),
                ..EventPatch::default()
            },
        };
        let once = engine.update_event(update.clone()).unwrap();
        let twice = engine.update_event(update).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut updated = notifier.subscribe(Topic::new(EntityKind::User, ChangeKind::Updated));
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let err = engine.update_user(UserUpdate {
            id: UserId::from("ghost"),
            patch: UserPatch::default(),
        });
        assert_eq!(
            err,
            Err(MutationError::NotFound {
                entity: EntityKind::User,
                id: String::from("ghost"),
            })
        );
        assert!(updated.try_recv_change().is_none());
    }

    #[test]
    fn delete_unknown_id_is_not_found_for_every_kind() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);

        assert!(matches!(
            engine.delete_user(&UserId::from("x")),
            Err(MutationError::NotFound { entity: EntityKind::User, .. })
        ));
        assert!(matches!(
            engine.delete_location(&LocationId::from("x")),
            Err(MutationError::NotFound { entity: EntityKind::Location, .. })
        ));
        assert!(matches!(
            engine.delete_event(&EventId::from("x")),
            Err(MutationError::NotFound { entity: EntityKind::Event, .. })
        ));
        assert!(matches!(
            engine.delete_participant(&ParticipantId::from("x")),
            Err(MutationError::NotFound { entity: EntityKind::Participant, .. })
        ));
    }

    #[test]
    fn delete_returns_and_publishes_removed_record() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut deleted = notifier.subscribe_to::<Location>(ChangeKind::Deleted);
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let location = engine.create_location(new_location()).unwrap();
        let removed = engine.delete_location(&location.id).unwrap();
        assert_eq!(removed, location);
        assert!(engine.store().locations().is_empty());
        assert_eq!(deleted.try_recv(), Some(location));
    }

    #[test]
    fn delete_all_counts_and_publishes_nothing() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut deleted = notifier.subscribe_to::<Participant>(ChangeKind::Deleted);
        let mut engine = MutationEngine::new(&mut store, &notifier);

        for _ in 0..3 {
            let _ = engine
                .create_participant(NewParticipant {
                    event_id: EventId::from("e"),
                    user_id: UserId::from("u"),
                })
                .unwrap();
        }
        let before = engine.store().participants().len();
        assert_eq!(engine.delete_all_participants(), before);
        assert!(engine.store().participants().list().is_empty());
        assert_eq!(engine.delete_all_participants(), 0);
        assert!(deleted.try_recv().is_none());
    }

    #[test]
    fn participant_with_dangling_event_resolves_to_none() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let participant = engine
            .create_participant(NewParticipant {
                event_id: EventId::from("no-such-event"),
                user_id: UserId::from("no-such-user"),
            })
            .unwrap();

        let resolver = engine.store().resolver();
        assert!(resolver.participant_event(&participant).is_none());
        assert!(resolver.participant_user(&participant).is_none());
    }

    #[test]
    fn duplicate_attendance_is_allowed() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let input = NewParticipant {
            event_id: EventId::from("e"),
            user_id: UserId::from("u"),
        };
        let a = engine.create_participant(input.clone()).unwrap();
        let b = engine.create_participant(input).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(engine.store().participants().len(), 2);
    }

    #[test]
    fn hall_scenario() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let hall = engine.create_location(new_location()).unwrap();
        let event = engine.create_event(new_event()).unwrap();
        let event = engine
            .update_event(EventUpdate {
                id: event.id,
                patch: EventPatch {
                    location_id: Patch::Set(hall.id.clone()),
                    ..EventPatch::default()
                },
            })
            .unwrap();

        assert_eq!(engine.store().resolver().event_location(&event), Some(&hall));

        let _ = engine.delete_location(&hall.id).unwrap();
        let still_there = engine.store().events().find_by_id(&event.id).cloned().unwrap();
        assert_eq!(still_there.location_id, Some(hall.id));
        assert!(engine.store().resolver().event_location(&still_there).is_none());
    }

    #[test]
    fn deleting_user_does_not_cascade() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let user = engine
            .create_user(NewUser {
                username: String::from("ada"),
                email: Some(String::from("ada@example.com")),
            })
            .unwrap();
        let event = engine.create_event(new_event()).unwrap();
        let _ = engine
            .update_event(EventUpdate {
                id: event.id.clone(),
                patch: EventPatch {
                    user_id: Patch::Set(user.id.clone()),
                    ..EventPatch::default()
                },
            })
            .unwrap();
        let participant = engine
            .create_participant(NewParticipant {
                event_id: event.id.clone(),
                user_id: user.id.clone(),
            })
            .unwrap();

        let _ = engine.delete_user(&user.id).unwrap();
        assert!(engine.store().events().contains(&event.id));
        assert!(engine.store().participants().contains(&participant.id));
        assert!(engine.store().resolver().participant_user(&participant).is_none());
    }

    #[test]
    fn location_and_participant_updates() {
        let mut store = EntityStore::new();
        let notifier = ChangeNotifier::default();
        let mut engine = MutationEngine::new(&mut store, &notifier);

        let location = engine.create_location(new_location()).unwrap();
        let location = engine
            .update_location(LocationUpdate {
                id: location.id,
                patch: LocationPatch {
                    lat: Patch::Set(1.5),
                    ..LocationPatch::default()
                },
            })
            .unwrap();
        assert!(location.lat.is_some());
        assert!(location.lng.is_none());
        assert_eq!(location.name, "Hall");

        let participant = engine
            .create_participant(NewParticipant {
                event_id: EventId::from("e1"),
                user_id: UserId::from("u1"),
            })
            .unwrap();
        let participant = engine
            .update_participant(ParticipantUpdate {
                id: participant.id,
                patch: ParticipantPatch {
                    user_id: Some(UserId::from("u2")),
                    event_id: None,
                },
            })
            .unwrap();
        assert_eq!(participant.user_id.as_str(), "u2");
        assert_eq!(participant.event_id.as_str(), "e1");
    }
}
