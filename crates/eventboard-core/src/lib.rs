//! Mutation engine, change notifier, and process lifecycle for Eventboard.
//!
//! # Modules
//!
//! - [`mutation`] -- [`MutationEngine`], the sole writer of the store
//! - [`notifier`] -- [`ChangeNotifier`] topic fan-out and [`Subscription`]s
//! - [`patch`] -- [`ApplyPatch`] field-level merge for updates
//! - [`board`] -- [`Board`], the locked store shared by readers and writers
//! - [`config`] -- [`BoardConfig`] loaded from `eventboard-config.yaml`
//! - [`seed`] -- [`SeedDocument`] startup data
//! - [`error`] -- [`MutationError`]

pub mod board;
pub mod config;
pub mod error;
pub mod mutation;
pub mod notifier;
pub mod patch;
pub mod seed;

pub use board::{Board, BoardCounts, BoardMutations};
pub use config::{BoardConfig, ConfigError};
pub use error::MutationError;
pub use mutation::MutationEngine;
pub use notifier::{ChangeNotifier, DEFAULT_CHANNEL_CAPACITY, MAX_CHANNEL_CAPACITY, Subscription, TypedSubscription};
pub use patch::ApplyPatch;
pub use seed::{SeedDocument, SeedError, load_seed};
