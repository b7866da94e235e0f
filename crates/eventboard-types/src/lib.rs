//! Shared type definitions for Eventboard.
//!
//! This crate is the single source of truth for the record types used
//! across the workspace. Record and identifier types flow downstream to
//! `TypeScript` via `ts-rs` for API clients.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string identifiers for each record kind
//! - [`enums`] -- Entity kinds, change kinds, and notification topics
//! - [`structs`] -- The four record structs
//! - [`inputs`] -- Create inputs and partial-update patches
//! - [`record`] -- The [`Entity`] trait and type-erased [`Record`]
//! - [`change`] -- The [`Change`] notification payload

pub mod change;
pub mod enums;
pub mod ids;
pub mod inputs;
pub mod record;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use change::Change;
pub use enums::{ChangeKind, EntityKind, Topic, UnknownTopic};
pub use ids::{EventId, LocationId, ParticipantId, RecordId, UserId};
pub use inputs::{
    EventPatch, EventUpdate, LocationPatch, LocationUpdate, NewEvent, NewLocation,
    NewParticipant, NewUser, ParticipantPatch, ParticipantUpdate, Patch, UserPatch, UserUpdate,
};
pub use record::{Entity, Record};
pub use structs::{Event, Location, Participant, User};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs writes the bindings to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::UserId::export_all();
        let _ = crate::ids::LocationId::export_all();
        let _ = crate::ids::EventId::export_all();
        let _ = crate::ids::ParticipantId::export_all();

        // Enums
        let _ = crate::enums::EntityKind::export_all();
        let _ = crate::enums::ChangeKind::export_all();

        // Records
        let _ = crate::structs::User::export_all();
        let _ = crate::structs::Location::export_all();
        let _ = crate::structs::Event::export_all();
        let _ = crate::structs::Participant::export_all();
    }
}
