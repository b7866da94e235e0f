//! Field-level merge of update patches into stored records.
//!
//! Only the fields present in a patch are written. The record identifier
//! is never part of a patch.

use eventboard_types::{
    Entity, Event, EventPatch, Location, LocationPatch, Participant, ParticipantPatch, User,
    UserPatch,
};

/// A record kind that can be partially updated.
pub trait ApplyPatch: Entity {
    /// The patch type for this record kind.
    type Patch;

    /// Merge `patch` into `self`, leaving fields the patch omits untouched.
    fn apply_patch(&mut self, patch: Self::Patch);
}

impl ApplyPatch for User {
    type Patch = UserPatch;

    fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(username) = patch.username {
            self.username = username;
        }
        patch.email.apply_to(&mut self.email);
    }
}

impl ApplyPatch for Location {
    type Patch = LocationPatch;

    fn apply_patch(&mut self, patch: LocationPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(desc) = patch.desc {
            self.desc = desc;
        }
        patch.lat.apply_to(&mut self.lat);
        patch.lng.apply_to(&mut self.lng);
    }
}

impl ApplyPatch for Event {
    type Patch = EventPatch;

    fn apply_patch(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(desc) = patch.desc {
            self.desc = desc;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        patch.from.apply_to(&mut self.from);
        patch.to.apply_to(&mut self.to);
        patch.location_id.apply_to(&mut self.location_id);
        patch.user_id.apply_to(&mut self.user_id);
    }
}

impl ApplyPatch for Participant {
    type Patch = ParticipantPatch;

    fn apply_patch(&mut self, patch: ParticipantPatch) {
        if let Some(event_id) = patch.event_id {
            self.event_id = event_id;
        }
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
    }
}
