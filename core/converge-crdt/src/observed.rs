//! Shared engine for observed-remove collections.
//!
//! [`ORSet`](crate::ORSet) and [`ORMap`](crate::ORMap) differ only in the
//! payload carried per entry — unit for the set, the mapped value for the
//! map. This module implements the common skeleton once: per-entry Lamport
//! metadata with tombstones, the per-actor summary, delta extraction
//! against a remote summary, and the merge rules with conflict detection.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use converge_types::LamportTimestamp;
use serde::{Deserialize, Serialize};

use crate::error::{CrdtError, CrdtResult};
use crate::version_vector::VersionVector;

/// Per-entry bookkeeping: tombstone flag, authoring timestamp, payload.
///
/// Tombstoned entries keep their payload as a corpse so that metadata
/// equality at equal timestamps stays well-defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct EntryMeta<A, P> {
    pub(crate) deleted: bool,
    pub(crate) ts: LamportTimestamp<A>,
    pub(crate) payload: P,
}

/// The observed-remove skeleton: a keyed metadata dictionary plus the
/// owning replica's Lamport clock.
///
/// Tombstones are never physically removed, so memory grows with the
/// total number of distinct keys ever inserted. Compacting them would
/// require a causal-stability oracle this crate does not have.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ObservedEntries<A, K, P>
where
    A: Eq + Hash,
    K: Eq + Hash,
{
    pub(crate) clock: LamportTimestamp<A>,
    pub(crate) entries: HashMap<K, EntryMeta<A, P>>,
}

/// Filtered metadata sub-dictionary shipped between replicas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ObservedDelta<A, K, P>
where
    A: Eq + Hash,
    K: Eq + Hash,
{
    pub(crate) entries: HashMap<K, EntryMeta<A, P>>,
}

impl<A, K, P> ObservedEntries<A, K, P>
where
    A: Clone + Eq + Hash + Ord,
    K: Clone + Eq + Hash,
    P: Clone + PartialEq,
{
    pub(crate) fn with_clock(actor: A, clock: u64) -> Self {
        Self {
            clock: LamportTimestamp::new(clock, actor),
            entries: HashMap::new(),
        }
    }

    /// Writes a live entry for `key` at the next local timestamp.
    ///
    /// Returns the previous payload if the key was live before.
    pub(crate) fn upsert(&mut self, key: K, payload: P) -> Option<P> {
        self.clock.tick();
        let meta = EntryMeta {
            deleted: false,
            ts: self.clock.clone(),
            payload,
        };
        match self.entries.insert(key, meta) {
            Some(previous) if !previous.deleted => Some(previous.payload),
            _ => None,
        }
    }

    /// Tombstones `key` at the next local timestamp if it is live.
    ///
    /// Returns the payload that was live, or `None` if the key was absent
    /// or already tombstoned.
    pub(crate) fn tombstone(&mut self, key: &K) -> Option<P> {
        match self.entries.get_mut(key) {
            Some(entry) if !entry.deleted => {
                self.clock.tick();
                entry.deleted = true;
                entry.ts = self.clock.clone();
                Some(entry.payload.clone())
            }
            _ => None,
        }
    }

    pub(crate) fn is_live(&self, key: &K) -> bool {
        self.entries.get(key).map_or(false, |e| !e.deleted)
    }

    pub(crate) fn payload(&self, key: &K) -> Option<&P> {
        self.entries.get(key).filter(|e| !e.deleted).map(|e| &e.payload)
    }

    pub(crate) fn live_iter(&self) -> impl Iterator<Item = (&K, &P)> {
        self.entries
            .iter()
            .filter(|(_, meta)| !meta.deleted)
            .map(|(key, meta)| (key, &meta.payload))
    }

    pub(crate) fn live_len(&self) -> usize {
        self.entries.values().filter(|meta| !meta.deleted).count()
    }

    /// Per-actor highest clock appearing in any metadata entry.
    pub(crate) fn state(&self) -> VersionVector<A> {
        let mut vector = VersionVector::new();
        for meta in self.entries.values() {
            vector.observe(meta.ts.actor().clone(), meta.ts.clock());
        }
        vector
    }

    /// Entries whose actor the remote summary lacks, or whose clock
    /// exceeds the remote's record for that actor.
    pub(crate) fn delta(
        &self,
        remote: Option<&VersionVector<A>>,
    ) -> Option<ObservedDelta<A, K, P>> {
        let entries: HashMap<K, EntryMeta<A, P>> = self
            .entries
            .iter()
            .filter(|(_, meta)| remote.map_or(true, |r| r.get(meta.ts.actor()) < meta.ts.clock()))
            .map(|(key, meta)| (key.clone(), meta.clone()))
            .collect();

        if entries.is_empty() {
            None
        } else {
            Some(ObservedDelta { entries })
        }
    }

    /// Per-key higher-timestamp selection. Never fails; at truly equal
    /// timestamps the local entry is kept.
    pub(crate) fn merge(&mut self, other: &Self) {
        for (key, incoming) in &other.entries {
            match self.entries.get_mut(key) {
                Some(local) => {
                    if incoming.ts > local.ts {
                        *local = incoming.clone();
                    }
                }
                None => {
                    self.entries.insert(key.clone(), incoming.clone());
                }
            }
        }
        self.clock.observe(other.clock.clock());
    }

    /// Per-entry higher-timestamp selection with conflict detection.
    ///
    /// An incoming entry whose timestamp equals a local entry's but whose
    /// metadata differs signals two divergent histories under the same
    /// `(clock, actor)` pair. Conflicts are detected before anything is
    /// applied, so a failed merge leaves the replica untouched.
    pub(crate) fn merge_delta(&mut self, delta: &ObservedDelta<A, K, P>) -> CrdtResult<()>
    where
        K: Debug,
    {
        for (key, incoming) in &delta.entries {
            if let Some(local) = self.entries.get(key) {
                if incoming.ts == local.ts
                    && (incoming.deleted != local.deleted || incoming.payload != local.payload)
                {
                    return Err(CrdtError::ConflictingHistory(format!(
                        "divergent metadata for {key:?} under the same timestamp \
                         (clock {})",
                        local.ts.clock()
                    )));
                }
            }
        }

        let mut max_seen = self.clock.clock();
        for (key, incoming) in &delta.entries {
            max_seen = max_seen.max(incoming.ts.clock());
            match self.entries.get_mut(key) {
                Some(local) => {
                    if incoming.ts > local.ts {
                        *local = incoming.clone();
                    }
                }
                None => {
                    self.entries.insert(key.clone(), incoming.clone());
                }
            }
        }
        // Subsequent local operations must order after everything observed.
        self.clock.observe(max_seen);
        Ok(())
    }
}

impl<A, K, P> ObservedDelta<A, K, P>
where
    A: Eq + Hash,
    K: Eq + Hash,
{
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }
}
