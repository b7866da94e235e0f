//! Enumeration types: record kinds, change kinds, and notification topics.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The four record collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// A registered user.
    User,
    /// A place where events happen.
    Location,
    /// A scheduled event.
    Event,
    /// One user's attendance at one event.
    Participant,
}

impl EntityKind {
    /// All entity kinds in declaration order.
    pub const ALL: [Self; 4] = [Self::User, Self::Location, Self::Event, Self::Participant];

    /// Lowercase name used as the prefix of topic names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Location => "location",
            Self::Event => "event",
            Self::Participant => "participant",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Change kinds
// ---------------------------------------------------------------------------

/// The kind of mutation that produced a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ChangeKind {
    /// A record was created.
    Created,
    /// A record was patched.
    Updated,
    /// A single record was deleted.
    Deleted,
}

impl ChangeKind {
    /// All change kinds in declaration order.
    pub const ALL: [Self; 3] = [Self::Created, Self::Updated, Self::Deleted];

    /// Capitalized name used as the suffix of topic names.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
        }
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// A notification channel: one per (entity kind, change kind) pair.
///
/// Topics render as `userCreated`, `eventDeleted`, and so on. There are
/// exactly twelve, listed in [`Topic::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic {
    /// The collection the change applies to.
    pub entity: EntityKind,
    /// The mutation that happened.
    pub change: ChangeKind,
}

impl Topic {
    /// Every topic, grouped by entity kind.
    pub const ALL: [Self; 12] = [
        Self::new(EntityKind::User, ChangeKind::Created),
        Self::new(EntityKind::User, ChangeKind::Updated),
        Self::new(EntityKind::User, ChangeKind::Deleted),
        Self::new(EntityKind::Location, ChangeKind::Created),
        Self::new(EntityKind::Location, ChangeKind::Updated),
        Self::new(EntityKind::Location, ChangeKind::Deleted),
        Self::new(EntityKind::Event, ChangeKind::Created),
        Self::new(EntityKind::Event, ChangeKind::Updated),
        Self::new(EntityKind::Event, ChangeKind::Deleted),
        Self::new(EntityKind::Participant, ChangeKind::Created),
        Self::new(EntityKind::Participant, ChangeKind::Updated),
        Self::new(EntityKind::Participant, ChangeKind::Deleted),
    ];

    /// Build a topic from its two halves.
    pub const fn new(entity: EntityKind, change: ChangeKind) -> Self {
        Self { entity, change }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.entity.as_str(), self.change.as_str())
    }
}

/// A topic name did not match any of the twelve known topics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topic: {0}")]
pub struct UnknownTopic(pub String);

impl FromStr for Topic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|topic| {
                s.strip_prefix(topic.entity.as_str()) == Some(topic.change.as_str())
            })
            .ok_or_else(|| UnknownTopic(s.to_owned()))
    }
}

impl TryFrom<String> for Topic {
    type Error = UnknownTopic;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.to_string()
    }
}
