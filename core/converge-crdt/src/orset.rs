//! Observed-remove set CRDT.
//!
//! A set supporting both insert and remove. Every value carries a
//! `(tombstone, timestamp)` metadata pair; a remove only tombstones the
//! insertion it has observed, so a concurrent re-insert with a higher
//! timestamp survives synchronization. Timestamp ties between different
//! actors resolve by actor order.
//!
//! Tombstones are retained forever, so memory grows with the total number
//! of distinct values ever inserted.

use std::fmt::Debug;
use std::hash::Hash;

use converge_types::LamportTimestamp;
use serde::{Deserialize, Serialize};

use crate::error::CrdtResult;
use crate::observed::{ObservedDelta, ObservedEntries};
use crate::traits::{DeltaCrdt, Replicable};
use crate::version_vector::VersionVector;

/// An observed-remove set.
///
/// # Example
///
/// ```
/// use converge_crdt::ORSet;
///
/// let mut set = ORSet::new("A");
/// set.insert("apple");
/// set.insert("pear");
/// set.remove(&"apple");
///
/// assert!(!set.contains(&"apple"));
/// assert!(set.contains(&"pear"));
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ORSet<A, T>
where
    A: Eq + Hash,
    T: Eq + Hash,
{
    inner: ObservedEntries<A, T, ()>,
}

impl<A, T> ORSet<A, T>
where
    A: Clone + Eq + Hash + Ord,
    T: Clone + Eq + Hash,
{
    /// Creates an empty set owned by `actor`, starting at clock 0.
    #[must_use]
    pub fn new(actor: A) -> Self {
        Self::with_clock(actor, 0)
    }

    /// Creates an empty set owned by `actor` with an explicit initial
    /// clock.
    #[must_use]
    pub fn with_clock(actor: A, clock: u64) -> Self {
        Self {
            inner: ObservedEntries::with_clock(actor, clock),
        }
    }

    /// Returns the actor that owns this replica of the set.
    #[must_use]
    pub fn actor(&self) -> &A {
        self.inner.clock.actor()
    }

    /// Returns this replica's current Lamport timestamp.
    #[must_use]
    pub fn timestamp(&self) -> &LamportTimestamp<A> {
        &self.inner.clock
    }

    /// Inserts a value at the next local timestamp.
    ///
    /// Returns true if the value was absent or tombstoned before.
    pub fn insert(&mut self, value: T) -> bool {
        self.inner.upsert(value, ()).is_none()
    }

    /// Removes a value, tombstoning the insertion this replica observed.
    ///
    /// Returns the value if it was present, `None` otherwise.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        self.inner.tombstone(value).map(|()| value.clone())
    }

    /// Returns true if the set contains the value.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.inner.is_live(value)
    }

    /// Returns an iterator over the values in the set.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.inner.live_iter().map(|(value, _)| value)
    }

    /// Returns the number of values in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.live_len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A, T> Replicable for ORSet<A, T>
where
    A: Clone + Eq + Hash + Ord,
    T: Clone + Eq + Hash,
{
    fn merge(&mut self, other: &Self) {
        self.inner.merge(&other.inner);
    }
}

/// Delta for [`ORSet`]: the metadata entries a remote summary lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ORSetDelta<A, T>
where
    A: Eq + Hash,
    T: Eq + Hash,
{
    inner: ObservedDelta<A, T, ()>,
}

impl<A, T> ORSetDelta<A, T>
where
    A: Eq + Hash,
    T: Eq + Hash,
{
    /// Returns the number of metadata entries carried by this delta.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the delta carries no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.len() == 0
    }

    /// Returns true if the delta carries metadata for `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains(value)
    }
}

impl<A, T> DeltaCrdt for ORSet<A, T>
where
    A: Clone + Eq + Hash + Ord,
    T: Clone + Debug + Eq + Hash,
{
    type State = VersionVector<A>;
    type Delta = ORSetDelta<A, T>;

    fn state(&self) -> VersionVector<A> {
        self.inner.state()
    }

    fn delta(&self, remote: Option<&VersionVector<A>>) -> Option<ORSetDelta<A, T>> {
        self.inner.delta(remote).map(|inner| ORSetDelta { inner })
    }

    fn merge_delta(&mut self, delta: &ORSetDelta<A, T>) -> CrdtResult<()> {
        self.inner.merge_delta(&delta.inner)
    }
}

impl<A, T> PartialEq for ORSet<A, T>
where
    A: Eq + Hash,
    T: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        // Equality is over the replicated metadata; the local clock is
        // replica-specific bookkeeping, not state.
        self.inner.entries == other.inner.entries
    }
}

impl<A, T> Eq for ORSet<A, T>
where
    A: Eq + Hash,
    T: Eq + Hash,
{
}
