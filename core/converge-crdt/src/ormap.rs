//! Observed-remove map CRDT.
//!
//! Same skeleton as [`ORSet`](crate::ORSet), except every key's metadata
//! also carries the current value. Concurrent assignments to the same key
//! resolve last-writer-wins by Lamport timestamp, with actor order
//! breaking clock ties. A removed key keeps its last value as a corpse in
//! the tombstone.

use std::fmt::Debug;
use std::hash::Hash;

use converge_types::LamportTimestamp;
use serde::{Deserialize, Serialize};

use crate::error::CrdtResult;
use crate::observed::{ObservedDelta, ObservedEntries};
use crate::traits::{DeltaCrdt, Replicable};
use crate::version_vector::VersionVector;

/// An observed-remove map with last-writer-wins values.
///
/// # Example
///
/// ```
/// use converge_crdt::ORMap;
///
/// let mut map = ORMap::new("A");
/// map.insert("color", "teal");
/// map.insert("color", "plum");
///
/// assert_eq!(map.get(&"color"), Some(&"plum"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ORMap<A, K, V>
where
    A: Eq + Hash,
    K: Eq + Hash,
{
    inner: ObservedEntries<A, K, V>,
}

impl<A, K, V> ORMap<A, K, V>
where
    A: Clone + Eq + Hash + Ord,
    K: Clone + Eq + Hash,
    V: Clone + PartialEq,
{
    /// Creates an empty map owned by `actor`, starting at clock 0.
    #[must_use]
    pub fn new(actor: A) -> Self {
        Self::with_clock(actor, 0)
    }

    /// Creates an empty map owned by `actor` with an explicit initial
    /// clock.
    #[must_use]
    pub fn with_clock(actor: A, clock: u64) -> Self {
        Self {
            inner: ObservedEntries::with_clock(actor, clock),
        }
    }

    /// Returns the actor that owns this replica of the map.
    #[must_use]
    pub fn actor(&self) -> &A {
        self.inner.clock.actor()
    }

    /// Returns this replica's current Lamport timestamp.
    #[must_use]
    pub fn timestamp(&self) -> &LamportTimestamp<A> {
        &self.inner.clock
    }

    /// Assigns a value to a key at the next local timestamp.
    ///
    /// Returns the previous value if the key was present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.inner.upsert(key, value)
    }

    /// Removes a key, tombstoning the assignment this replica observed.
    ///
    /// Returns the value that was present, `None` otherwise. The value
    /// stays in the tombstone's metadata.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.inner.tombstone(key)
    }

    /// Returns the value for a key if it is present.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.payload(key)
    }

    /// Returns true if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.is_live(key)
    }

    /// Returns an iterator over the present keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner.live_iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the present values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.inner.live_iter().map(|(_, value)| value)
    }

    /// Returns an iterator over the present entries.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.inner.live_iter()
    }

    /// Returns the number of present keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.live_len()
    }

    /// Returns true if the map has no present keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A, K, V> Replicable for ORMap<A, K, V>
where
    A: Clone + Eq + Hash + Ord,
    K: Clone + Eq + Hash,
    V: Clone + PartialEq,
{
    fn merge(&mut self, other: &Self) {
        self.inner.merge(&other.inner);
    }
}

/// Delta for [`ORMap`]: the metadata entries a remote summary lacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ORMapDelta<A, K, V>
where
    A: Eq + Hash,
    K: Eq + Hash,
{
    inner: ObservedDelta<A, K, V>,
}

impl<A, K, V> ORMapDelta<A, K, V>
where
    A: Eq + Hash,
    K: Eq + Hash,
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

    /// Returns true if the delta carries metadata for `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }
}

impl<A, K, V> DeltaCrdt for ORMap<A, K, V>
where
    A: Clone + Eq + Hash + Ord,
    K: Clone + Debug + Eq + Hash,
    V: Clone + PartialEq,
{
    type State = VersionVector<A>;
    type Delta = ORMapDelta<A, K, V>;

    fn state(&self) -> VersionVector<A> {
        self.inner.state()
    }

    fn delta(&self, remote: Option<&VersionVector<A>>) -> Option<ORMapDelta<A, K, V>> {
        self.inner.delta(remote).map(|inner| ORMapDelta { inner })
    }

    fn merge_delta(&mut self, delta: &ORMapDelta<A, K, V>) -> CrdtResult<()> {
        self.inner.merge_delta(&delta.inner)
    }
}

impl<A, K, V> PartialEq for ORMap<A, K, V>
where
    A: Eq + Hash,
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        // Equality is over the replicated metadata; the local clock is
        // replica-specific bookkeeping, not state.
        self.inner.entries == other.inner.entries
    }
}

impl<A, K, V> Eq for ORMap<A, K, V>
where
    A: Eq + Hash,
    K: Eq + Hash,
    V: Eq,
{
}
