//! The [`Entity`] trait shared by the four record structs, and the
//! type-erased [`Record`] carried by change notifications.

use core::fmt::Debug;

use serde::Serialize;

use crate::enums::EntityKind;
use crate::ids::{EventId, LocationId, ParticipantId, RecordId, UserId};
use crate::structs::{Event, Location, Participant, User};

/// Behaviour common to every record kind.
///
/// Lets the store and notifier handle all four collections with one
/// generic implementation while keeping each collection strongly typed.
pub trait Entity: Clone + Debug + Serialize + Send + Sync + 'static {
    /// The identifier type of this record kind.
    type Id: RecordId;

    /// Which collection this record kind lives in.
    const KIND: EntityKind;

    /// The record's identifier.
    fn id(&self) -> &Self::Id;

    /// Wrap the record for delivery through a change notification.
    fn into_record(self) -> Record;

    /// Unwrap a notification payload, or `None` if it holds another kind.
    fn from_record(record: Record) -> Option<Self>;
}

/// A record of any kind.
///
/// Serializes as the bare inner record so that subscribers see the same
/// JSON shape as the list and find endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// A user record.
    User(User),
    /// A location record.
    Location(Location),
    /// An event record.
    Event(Event),
    /// A participant record.
    Participant(Participant),
}

impl Record {
    /// The collection this record belongs to.
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::User(_) => EntityKind::User,
            Self::Location(_) => EntityKind::Location,
            Self::Event(_) => EntityKind::Event,
            Self::Participant(_) => EntityKind::Participant,
        }
    }

    /// The record's identifier as a string slice.
    pub fn id_str(&self) -> &str {
        match self {
            Self::User(user) => user.id.as_str(),
            Self::Location(location) => location.id.as_str(),
            Self::Event(event) => event.id.as_str(),
            Self::Participant(participant) => participant.id.as_str(),
        }
    }
}

impl Entity for User {
    type Id = UserId;
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn into_record(self) -> Record {
        Record::User(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::User(user) => Some(user),
            _ => None,
        }
    }
}

impl Entity for Location {
    type Id = LocationId;
    const KIND: EntityKind = EntityKind::Location;

    fn id(&self) -> &LocationId {
        &self.id
    }

    fn into_record(self) -> Record {
        Record::Location(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Location(location) => Some(location),
            _ => None,
        }
    }
}

impl Entity for Event {
    type Id = EventId;
    const KIND: EntityKind = EntityKind::Event;

    fn id(&self) -> &EventId {
        &self.id
    }

    fn into_record(self) -> Record {
        Record::Event(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Event(event) => Some(event),
            _ => None,
        }
    }
}

impl Entity for Participant {
    type Id = ParticipantId;
    const KIND: EntityKind = EntityKind::Participant;

    fn id(&self) -> &ParticipantId {
        &self.id
    }

    fn into_record(self) -> Record {
        Record::Participant(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Participant(participant) => Some(participant),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: UserId::from("u1"),
            username: String::from("ada"),
            email: None,
        }
    }

    #[test]
    fn record_roundtrip_keeps_kind() {
        let record = user().into_record();
        assert_eq!(record.kind(), EntityKind::User);
        assert_eq!(record.id_str(), "u1");
        assert_eq!(User::from_record(record.clone()), Some(user()));
        assert!(Event::from_record(record).is_none());
    }

    #[test]
    fn record_serializes_untagged() {
        let value = serde_json::to_value(user().into_record()).unwrap_or_default();
        assert_eq!(value["id"], "u1");
        assert_eq!(value["username"], "ada");
    }
}
