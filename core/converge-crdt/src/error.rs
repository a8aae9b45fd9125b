//! Error types for CRDT merge operations.

use thiserror::Error;

/// Result type for fallible CRDT operations.
pub type CrdtResult<T> = Result<T, CrdtError>;

/// Errors that can occur when folding remote information into a replica.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrdtError {
    /// Two replicas produced different events under the same
    /// `(clock, actor)` pair.
    ///
    /// Under the protocol this is causally impossible for well-behaved
    /// replicas; it almost always means two live replicas share an actor
    /// id. The merge is abandoned without applying any entry, and the
    /// offending replica should be investigated.
    #[error("conflicting history: {0}")]
    ConflictingHistory(String),
}
