//! Startup seed data.
//!
//! A seed document is a JSON object with optional `events`, `locations`,
//! `users`, and `participants` arrays. Records keep the identifiers given
//! in the document and go straight into the store: seeding bypasses the
//! mutation engine and publishes nothing.

use std::path::Path;

use eventboard_store::{EntityStore, StoreError, Stored};
use eventboard_types::{Event, Location, Participant, User};
use serde::Deserialize;
use tracing::info;

/// Errors that can occur when loading seed data.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Failed to read the seed file from disk.
    #[error("failed to read seed file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The seed document is not valid JSON or has the wrong shape.
    #[error("failed to parse seed JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The seed document contains a duplicate identifier.
    #[error("invalid seed data: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

/// The contents of a seed document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SeedDocument {
    /// Events to preload.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Locations to preload.
    #[serde(default)]
    pub locations: Vec<Location>,
    /// Users to preload.
    #[serde(default)]
    pub users: Vec<User>,
    /// Participant records to preload.
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl SeedDocument {
    /// Parse a seed document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Json`] if the text is not a valid seed document.
    pub fn parse(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a seed document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Io`] if the file cannot be read, or
    /// [`SeedError::Json`] if its content is not a valid seed document.
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Insert every record into `store`, keeping document order.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Store`] if an identifier is already present in
    /// its collection, whether from earlier in the document or from the
    /// store's existing contents.
    pub fn load_into(self, store: &mut EntityStore) -> Result<(), SeedError> {
        let users = self.users.len();
        let locations = self.locations.len();
        let events = self.events.len();
        let participants = self.participants.len();

        insert_all(store, self.users)?;
        insert_all(store, self.locations)?;
        insert_all(store, self.events)?;
        insert_all(store, self.participants)?;

        info!(users, locations, events, participants, "seed data loaded");
        Ok(())
    }

    /// Build a fresh store holding exactly this document's records.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Store`] on a duplicate identifier.
    pub fn into_store(self) -> Result<EntityStore, SeedError> {
        let mut store = EntityStore::new();
        self.load_into(&mut store)?;
        Ok(store)
    }
}

fn insert_all<E: Stored>(store: &mut EntityStore, records: Vec<E>) -> Result<(), StoreError> {
    let collection = store.collection_mut::<E>();
    for record in records {
        collection.insert(record)?;
    }
    Ok(())
}

/// Read a seed file and build a store from it.
///
/// # Errors
///
/// Returns any [`SeedError`] from reading, parsing, or inserting.
pub fn load_seed(path: &Path) -> Result<EntityStore, SeedError> {
    info!(path = %path.display(), "loading seed data");
    SeedDocument::from_file(path)?.into_store()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eventboard_types::{EntityKind, EventId, LocationId};

    use super::*;

    const SEED: &str = r#"{
        "events": [
            { "id": "e1", "title": "Meetup", "desc": "Monthly", "date": "2024-01-01",
              "from": "18:00", "to": "21:00", "location_id": "l1", "user_id": "u1" },
            { "id": "e2", "title": "Retro", "desc": "", "date": "2024-02-01" }
        ],
        "locations": [
            { "id": "l1", "name": "Hall", "desc": "Main hall", "lat": 52.5, "lng": 13.4 }
        ],
        "users": [
            { "id": "u1", "username": "ada", "email": "ada@example.com" },
            { "id": "u2", "username": "grace" }
        ],
        "participants": [
            { "id": "p1", "event_id": "e1", "user_id": "u2" }
        ]
    }"#;

    #[test]
    fn seed_loads_all_collections() {
        let store = SeedDocument::parse(SEED).unwrap().into_store().unwrap();
        assert_eq!(store.count(EntityKind::Event), 2);
        assert_eq!(store.count(EntityKind::Location), 1);
        assert_eq!(store.count(EntityKind::User), 2);
        assert_eq!(store.count(EntityKind::Participant), 1);

        let event = store.events().find_by_id(&EventId::from("e1")).unwrap();
        assert_eq!(event.location_id, Some(LocationId::from("l1")));
        let location = store.resolver().event_location(event).unwrap();
        assert_eq!(location.name, "Hall");
    }

    #[test]
    fn seed_keeps_document_order() {
        let store = SeedDocument::parse(SEED).unwrap().into_store().unwrap();
        let ids: Vec<&str> = store.events().list().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e1", "e2"]);
    }

    #[test]
    fn missing_keys_are_empty() {
        let store = SeedDocument::parse(r#"{ "users": [] }"#)
            .unwrap()
            .into_store()
            .unwrap();
        assert_eq!(store.count(EntityKind::Event), 0);
        assert_eq!(store.count(EntityKind::User), 0);
    }

    #[test]
    fn duplicate_id_fails_the_load() {
        let json = r#"{ "users": [
            { "id": "u1", "username": "ada" },
            { "id": "u1", "username": "grace" }
        ] }"#;
        let result = SeedDocument::parse(json).unwrap().into_store();
        assert!(matches!(
            result,
            Err(SeedError::Store {
                source: StoreError::DuplicateId { entity: EntityKind::User, .. }
            })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SeedDocument::parse("{ not json"),
            Err(SeedError::Json { .. })
        ));
        assert!(matches!(
            SeedDocument::parse(r#"{ "users": [ { "id": "u1" } ] }"#),
            Err(SeedError::Json { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_seed(Path::new("/nonexistent/data.json"));
        assert!(matches!(result, Err(SeedError::Io { .. })));
    }
}
