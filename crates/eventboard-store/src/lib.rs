//! In-memory entity store and relationship resolver for Eventboard.
//!
//! # Modules
//!
//! - [`collection`] -- One insertion-ordered collection of records
//! - [`store`] -- [`EntityStore`] aggregating the four collections
//! - [`resolve`] -- [`Resolver`] computing related records on read
//! - [`error`] -- [`StoreError`]
//!
//! The store holds plain records only. Identifier generation, patch
//! merging, and change notification live in `eventboard-core`.

pub mod collection;
pub mod error;
pub mod resolve;
pub mod store;

pub use collection::Collection;
pub use error::StoreError;
pub use resolve::Resolver;
pub use store::{EntityStore, Stored};
