//! Binding between REST collections and mutation engine operations.
//!
//! Each record kind implements [`Resource`] so one set of generic handlers
//! serves all four collections.

use eventboard_core::{ApplyPatch, BoardMutations, MutationError};
use eventboard_store::Stored;
use eventboard_types::{
    Event, EventUpdate, Location, LocationUpdate, NewEvent, NewLocation, NewParticipant, NewUser,
    Participant, ParticipantUpdate, User, UserUpdate,
};
use serde::de::DeserializeOwned;

/// A record kind exposed as a REST collection.
pub trait Resource: Stored + ApplyPatch {
    /// Path segment under `/api`, e.g. `users`.
    const PATH: &'static str;

    /// Request body for creation.
    type Input: DeserializeOwned + Send + 'static;

    /// Create a record through the mutation engine.
    ///
    /// # Errors
    ///
    /// Propagates [`MutationError`] from the engine.
    fn create(engine: &mut BoardMutations<'_>, input: Self::Input) -> Result<Self, MutationError>;

    /// Patch a record through the mutation engine.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if `id` names no record.
    fn update(
        engine: &mut BoardMutations<'_>,
        id: Self::Id,
        patch: Self::Patch,
    ) -> Result<Self, MutationError>;

    /// Delete a record through the mutation engine.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::NotFound`] if `id` names no record.
    fn delete(engine: &mut BoardMutations<'_>, id: &Self::Id) -> Result<Self, MutationError>;

    /// Delete the whole collection, returning how many records were
    /// removed.
    fn delete_all(engine: &mut BoardMutations<'_>) -> usize;
}

impl Resource for User {
    const PATH: &'static str = "users";
    type Input = NewUser;

    fn create(engine: &mut BoardMutations<'_>, input: NewUser) -> Result<Self, MutationError> {
        engine.create_user(input)
    }

    fn update(
        engine: &mut BoardMutations<'_>,
        id: Self::Id,
        patch: Self::Patch,
    ) -> Result<Self, MutationError> {
        engine.update_user(UserUpdate { id, patch })
    }

    fn delete(engine: &mut BoardMutations<'_>, id: &Self::Id) -> Result<Self, MutationError> {
        engine.delete_user(id)
    }

    fn delete_all(engine: &mut BoardMutations<'_>) -> usize {
        engine.delete_all_users()
    }
}

impl Resource for Location {
    const PATH: &'static str = "locations";
    type Input = NewLocation;

    fn create(engine: &mut BoardMutations<'_>, input: NewLocation) -> Result<Self, MutationError> {
        engine.create_location(input)
    }

    fn update(
        engine: &mut BoardMutations<'_>,
        id: Self::Id,
        patch: Self::Patch,
    ) -> Result<Self, MutationError> {
        engine.update_location(LocationUpdate { id, patch })
    }

    fn delete(engine: &mut BoardMutations<'_>, id: &Self::Id) -> Result<Self, MutationError> {
        engine.delete_location(id)
    }

    fn delete_all(engine: &mut BoardMutations<'_>) -> usize {
        engine.delete_all_locations()
    }
}

impl Resource for Event {
    const PATH: &'static str = "events";
    type Input = NewEvent;

    fn create(engine: &mut BoardMutations<'_>, input: NewEvent) -> Result<Self, MutationError> {
        engine.create_event(input)
    }

    fn update(
        engine: &mut BoardMutations<'_>,
        id: Self::Id,
        patch: Self::Patch,
    ) -> Result<Self, MutationError> {
        engine.update_event(EventUpdate { id, patch })
    }

    fn delete(engine: &mut BoardMutations<'_>, id: &Self::Id) -> Result<Self, MutationError> {
        engine.delete_event(id)
    }

    fn delete_all(engine: &mut BoardMutations<'_>) -> usize {
        engine.delete_all_events()
    }
}

impl Resource for Participant {
    const PATH: &'static str = "participants";
    type Input = NewParticipant;

    fn create(
        engine: &mut BoardMutations<'_>,
        input: NewParticipant,
    ) -> Result<Self, MutationError> {
        engine.create_participant(input)
    }

    fn update(
        engine: &mut BoardMutations<'_>,
        id: Self::Id,
        patch: Self::Patch,
    ) -> Result<Self, MutationError> {
        engine.update_participant(ParticipantUpdate { id, patch })
    }

    fn delete(engine: &mut BoardMutations<'_>, id: &Self::Id) -> Result<Self, MutationError> {
        engine.delete_participant(id)
    }

    fn delete_all(engine: &mut BoardMutations<'_>) -> usize {
        engine.delete_all_participants()
    }
}
