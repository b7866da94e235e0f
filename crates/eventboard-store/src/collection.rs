//! An ordered collection of records of one kind.
//!
//! Records are kept in insertion order, which is the order `list()`
//! returns them in. Lookups are linear scans by identifier; the store is
//! sized for small working sets and keeps no secondary index.

use eventboard_types::Entity;

use crate::error::StoreError;

/// Insertion-ordered records of a single kind, unique by identifier.
#[derive(Debug, Clone)]
pub struct Collection<E: Entity> {
    records: Vec<E>,
}

impl<E: Entity> Collection<E> {
    /// Create an empty collection.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// All records, in insertion order.
    pub fn list(&self) -> &[E] {
        &self.records
    }

    /// Look up a record by identifier.
    pub fn find_by_id(&self, id: &E::Id) -> Option<&E> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Whether a record with this identifier exists.
    pub fn contains(&self, id: &E::Id) -> bool {
        self.position(id).is_some()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record that already carries its final identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if a record with the same
    /// identifier is already present.
    pub fn insert(&mut self, record: E) -> Result<(), StoreError> {
        if self.contains(record.id()) {
            return Err(StoreError::DuplicateId {
                entity: E::KIND,
                id: record.id().to_string(),
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Overwrite the record with identifier `id`, keeping its position.
    ///
    /// Returns the stored record, or `None` (and drops `record`) if no
    /// record has that identifier.
    pub fn replace_at(&mut self, id: &E::Id, record: E) -> Option<&E> {
        let index = self.position(id)?;
        let slot = self.records.get_mut(index)?;
        *slot = record;
        Some(slot)
    }

    /// Remove and return the record with identifier `id`.
    pub fn remove_by_id(&mut self, id: &E::Id) -> Option<E> {
        let index = self.position(id)?;
        Some(self.records.remove(index))
    }

    /// Remove every record, returning how many were removed.
    pub fn remove_all(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        removed
    }

    fn position(&self, id: &E::Id) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self::new()
    }
}
