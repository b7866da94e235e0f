//! HTTP and `WebSocket` adapter for Eventboard.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **REST endpoints** for listing, finding, creating, patching, and
//!   deleting users, locations, events, and participant records, plus
//!   read-only relationship routes
//! - **`WebSocket` endpoint** (`/ws/{topic}`) streaming every change
//!   published on one of the twelve topics
//! - **Minimal HTML status page** (`GET /`) with record counts
//!
//! # Architecture
//!
//! Handlers share one [`Board`](eventboard_core::Board). Reads take its
//! read lock. Writes run through the mutation engine under the write lock,
//! which publishes the change before the lock is released; `WebSocket`
//! handlers hold a subscription for the lifetime of the connection.

pub mod error;
pub mod handlers;
pub mod resource;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use resource::Resource;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
