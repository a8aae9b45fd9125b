//! Core type definitions for Converge.
//!
//! This crate defines the fundamental, CRDT-agnostic types used throughout
//! the library:
//! - Replica identifiers (UUID v7)
//! - Lamport timestamps for causal ordering
//!
//! Everything that knows about a concrete CRDT (counters, sets, maps)
//! belongs in `converge-crdt`, not here.

mod ids;
mod timestamp;

pub use ids::ReplicaId;
pub use timestamp::LamportTimestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
