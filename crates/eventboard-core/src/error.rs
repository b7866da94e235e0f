//! Error types for mutations.
//!
//! Configuration and seed loading define their own errors in
//! [`crate::config`] and [`crate::seed`].

use eventboard_store::StoreError;
use eventboard_types::{Entity, EntityKind};

/// Errors returned by [`MutationEngine`](crate::mutation::MutationEngine)
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// An update or delete referenced an identifier with no record.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The collection that was searched.
        entity: EntityKind,
        /// The identifier that was not found.
        id: String,
    },

    /// The store rejected an insert.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

impl MutationError {
    /// Build a [`MutationError::NotFound`] for a record kind and identifier.
    pub fn not_found<E: Entity>(id: &E::Id) -> Self {
        Self::NotFound {
            entity: E::KIND,
            id: id.to_string(),
        }
    }
}
