//! Create and update inputs for the four record kinds.
//!
//! Creation inputs carry exactly the fields a new record is built from;
//! every other field starts unset. Update inputs carry the target id plus a
//! patch in which every field has an explicit presence marker:
//!
//! - required record fields use [`Option`]: `None` leaves the stored value
//!   untouched (an explicit JSON `null` is treated the same way, since a
//!   required field cannot be unset);
//! - optional record fields use [`Patch`], which tells an omitted field
//!   ([`Patch::Absent`]) apart from an explicit `null` ([`Patch::Clear`]).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ids::{EventId, LocationId, ParticipantId, UserId};

// ---------------------------------------------------------------------------
// Patch marker
// ---------------------------------------------------------------------------

/// Presence marker for a patchable optional field.
///
/// Deserialize fields of this type with `#[serde(default)]`: a missing key
/// becomes [`Patch::Absent`], `null` becomes [`Patch::Clear`], and any other
/// value becomes [`Patch::Set`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// The field was not supplied; keep the stored value.
    Absent,
    /// The field was supplied as `null`; unset the stored value.
    Clear,
    /// The field was supplied with a value.
    Set(T),
}

impl<T> Patch<T> {
    /// Whether the field was omitted.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Merge this patch into a stored optional value.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Self::Absent => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value),
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Clear, Self::Set)
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Absent | Self::Clear => serializer.serialize_none(),
            Self::Set(value) => serializer.serialize_some(value),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Fields a new user is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name.
    pub username: String,
    /// Optional contact address.
    #[serde(default)]
    pub email: Option<String>,
}

/// Partial update for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New contact address, or `null` to unset it.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub email: Patch<String>,
}

/// Update request targeting one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    /// The user to patch.
    pub id: UserId,
    /// Fields to merge.
    #[serde(flatten)]
    pub patch: UserPatch,
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Fields a new location is created from. Coordinates start unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLocation {
    /// Short name.
    pub name: String,
    /// Free-form description.
    pub desc: String,
}

/// Partial update for a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// New latitude, or `null` to unset it.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub lat: Patch<f64>,
    /// New longitude, or `null` to unset it.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub lng: Patch<f64>,
}

/// Update request targeting one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// The location to patch.
    pub id: LocationId,
    /// Fields to merge.
    #[serde(flatten)]
    pub patch: LocationPatch,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Fields a new event is created from. Times, location, and organizer start
/// unset and are attached later with an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Title.
    pub title: String,
    /// Free-form description.
    pub desc: String,
    /// Calendar date.
    pub date: String,
}

/// Partial update for an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// New date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// New start time, or `null` to unset it.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub from: Patch<String>,
    /// New end time, or `null` to unset it.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub to: Patch<String>,
    /// New location reference, or `null` to detach it.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub location_id: Patch<LocationId>,
    /// New organizer reference, or `null` to detach it.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub user_id: Patch<UserId>,
}

/// Update request targeting one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUpdate {
    /// The event to patch.
    pub id: EventId,
    /// Fields to merge.
    #[serde(flatten)]
    pub patch: EventPatch,
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// Fields a new participant is created from. Neither reference is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParticipant {
    /// The attended event.
    pub event_id: EventId,
    /// The attending user.
    pub user_id: UserId,
}

/// Partial update for a participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantPatch {
    /// New event reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<EventId>,
    /// New user reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Update request targeting one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantUpdate {
    /// The participant to patch.
    pub id: ParticipantId,
    /// Fields to merge.
    #[serde(flatten)]
    pub patch: ParticipantPatch,
}
