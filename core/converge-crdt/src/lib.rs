//! Delta-state CRDT implementations for Converge.
//!
//! This crate provides Conflict-free Replicated Data Types for
//! optimistic, multi-writer collaboration:
//!
//! - [`GCounter<A>`] — grow-only distributed counter
//! - [`PNCounter<A>`] — increment/decrement counter
//! - [`ORSet<A, T>`] — observed-remove set
//! - [`ORMap<A, K, V>`] — observed-remove map with last-writer-wins values
//! - [`VersionVector<A>`] — per-actor clock summary used by the delta
//!   protocol
//!
//! All CRDTs satisfy the replication laws through [`Replicable`]:
//! - **Commutative**: `a.merged(b) == b.merged(a)`
//! - **Associative**: `a.merged(b.merged(c)) == a.merged(b).merged(c)`
//! - **Idempotent**: `a.merged(a) == a`
//!
//! so replicas converge to the same state regardless of the order in
//! which they exchange information.
//!
//! # Delta synchronization
//!
//! Shipping full states on every exchange is wasteful. Through
//! [`DeltaCrdt`], a replica publishes a compact per-actor summary
//! ([`DeltaCrdt::state`]) and a peer answers with only the entries that
//! summary cannot have seen:
//!
//! ```
//! use converge_crdt::{DeltaCrdt, ORSet};
//!
//! let mut a = ORSet::new("A");
//! a.insert("x");
//!
//! let mut b = ORSet::new("B");
//! b.insert("y");
//!
//! // b answers a's summary with just the missing metadata.
//! let delta = b.delta(Some(&a.state())).expect("b has news for a");
//! a.merge_delta(&delta)?;
//!
//! assert!(a.contains(&"x"));
//! assert!(a.contains(&"y"));
//! # Ok::<(), converge_crdt::CrdtError>(())
//! ```
//!
//! Unlike full-state merging, [`DeltaCrdt::merge_delta`] checks causal
//! invariants and fails with [`CrdtError::ConflictingHistory`] when two
//! replicas have produced divergent events under the same
//! `(clock, actor)` pair — typically a duplicated actor id.
//!
//! # Tombstones
//!
//! ORSet and ORMap retain a tombstone for every removed entry so that
//! concurrent operations can be resolved against it. Nothing compacts
//! them, so memory grows with the total number of distinct keys ever
//! inserted.

mod error;
mod gcounter;
mod observed;
mod ormap;
mod orset;
mod pn_counter;
mod traits;
mod version_vector;

pub use error::{CrdtError, CrdtResult};
pub use gcounter::{GCounter, GCounterDelta};
pub use ormap::{ORMap, ORMapDelta};
pub use orset::{ORSet, ORSetDelta};
pub use pn_counter::{PNCounter, PNCounterDelta, PNCounterState};
pub use traits::{DeltaCrdt, Replicable};
pub use version_vector::{CausalOrder, VersionVector};
