//! Record structs for the four collections.
//!
//! Relationships between records are expressed only through foreign-key
//! fields (`location_id`, `user_id`, `event_id`). The related records
//! themselves are never stored inline; they are resolved on read.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{EventId, LocationId, ParticipantId, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user. A user organizes events through [`Event::user_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Contact address. Unset until supplied at creation or by an update.
    #[serde(default)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A place where events happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Unique identifier.
    pub id: LocationId,
    /// Short name, e.g. "Hall".
    pub name: String,
    /// Free-form description.
    pub desc: String,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub lng: Option<f64>,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A scheduled event.
///
/// `location_id` and `user_id` are not validated: they may point at records
/// that do not exist (or no longer exist).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Title shown in listings.
    pub title: String,
    /// Free-form description.
    pub desc: String,
    /// Calendar date, kept as the caller supplied it.
    pub date: String,
    /// Start time.
    #[serde(default)]
    pub from: Option<String>,
    /// End time.
    #[serde(default)]
    pub to: Option<String>,
    /// Where the event takes place.
    #[serde(default)]
    pub location_id: Option<LocationId>,
    /// The organizer.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// Join record: one user's attendance at one event.
///
/// The same (`event_id`, `user_id`) pair may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Participant {
    /// Unique identifier.
    pub id: ParticipantId,
    /// The attended event.
    pub event_id: EventId,
    /// The attending user.
    pub user_id: UserId,
}
