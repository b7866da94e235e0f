//! Error types for the `eventboard-store` crate.

use eventboard_types::EntityKind;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A record was inserted with an identifier already present in its
    /// collection.
    #[error("duplicate {entity} id: {id}")]
    DuplicateId {
        /// The collection the insert targeted.
        entity: EntityKind,
        /// The conflicting identifier.
        id: String,
    },
}
