//! Grow-only counter CRDT.
//!
//! Each actor owns one `(clock, count)` entry and only ever increases it.
//! The counter value is the sum of all per-actor counts, so concurrent
//! increments on different replicas combine instead of conflicting.
//!
//! Arithmetic saturates at `u64::MAX` and never wraps; saturation is
//! silent, not an error.

use std::collections::HashMap;
use std::hash::Hash;

use converge_types::LamportTimestamp;
use serde::{Deserialize, Serialize};

use crate::error::CrdtResult;
use crate::traits::{DeltaCrdt, Replicable};
use crate::version_vector::VersionVector;

/// One actor's share of the counter: the count and the Lamport clock of
/// the increment that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CounterEntry {
    pub(crate) clock: u64,
    pub(crate) count: u64,
}

impl CounterEntry {
    const ZERO: Self = Self { clock: 0, count: 0 };

    /// True if `incoming` supersedes `self` under the merge rule: higher
    /// clock wins; at equal clock the larger count is the newer one under
    /// monotonicity.
    fn superseded_by(&self, incoming: &Self) -> bool {
        incoming.clock > self.clock || (incoming.clock == self.clock && incoming.count > self.count)
    }
}

/// A grow-only counter (G-Counter).
///
/// Each replica increments only its own entry; entries for other actors
/// change only by merging, and only monotonically. The total value never
/// decreases across any sequence of increments and merges.
///
/// # Example
///
/// ```
/// use converge_crdt::{GCounter, Replicable};
///
/// let mut a = GCounter::new("A");
/// a.increment();
/// a.increment();
///
/// let mut b = GCounter::new("B");
/// b.increment();
///
/// assert_eq!(a.merged(&b).value(), 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GCounter<A>
where
    A: Eq + Hash,
{
    clock: LamportTimestamp<A>,
    entries: HashMap<A, CounterEntry>,
}

impl<A> GCounter<A>
where
    A: Clone + Eq + Hash,
{
    /// Creates a counter owned by `actor`, starting at clock 0.
    #[must_use]
    pub fn new(actor: A) -> Self {
        Self::with_clock(actor, 0)
    }

    /// Creates a counter owned by `actor` with an explicit initial clock.
    #[must_use]
    pub fn with_clock(actor: A, clock: u64) -> Self {
        Self {
            clock: LamportTimestamp::new(clock, actor),
            entries: HashMap::new(),
        }
    }

    /// Returns the actor that owns this replica of the counter.
    #[must_use]
    pub fn actor(&self) -> &A {
        self.clock.actor()
    }

    /// Returns this replica's current Lamport timestamp.
    #[must_use]
    pub fn timestamp(&self) -> &LamportTimestamp<A> {
        &self.clock
    }

    /// Increments this replica's count by 1.
    pub fn increment(&mut self) {
        self.increment_by(1);
    }

    /// Increments this replica's count by `amount`, saturating at
    /// `u64::MAX`.
    pub fn increment_by(&mut self, amount: u64) {
        self.clock.tick();
        let entry = self
            .entries
            .entry(self.clock.actor().clone())
            .or_insert(CounterEntry::ZERO);
        entry.clock = self.clock.clock();
        entry.count = entry.count.saturating_add(amount);
    }

    /// Returns the total counter value across all actors, saturating at
    /// `u64::MAX`.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.entries
            .values()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.count))
    }

    /// Returns the count contributed by a specific actor.
    #[must_use]
    pub fn count_for(&self, actor: &A) -> u64 {
        self.entries.get(actor).map(|e| e.count).unwrap_or(0)
    }
}

impl<A> Replicable for GCounter<A>
where
    A: Clone + Eq + Hash,
{
    fn merge(&mut self, other: &Self) {
        for (actor, incoming) in &other.entries {
            match self.entries.get_mut(actor) {
                Some(local) => {
                    if local.superseded_by(incoming) {
                        *local = *incoming;
                    }
                }
                None => {
                    self.entries.insert(actor.clone(), *incoming);
                }
            }
        }
        self.clock.observe(other.clock.clock());
    }
}

/// Delta for [`GCounter`]: the per-actor entries a remote summary lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GCounterDelta<A>
where
    A: Eq + Hash,
{
    pub(crate) entries: HashMap<A, CounterEntry>,
}

impl<A> GCounterDelta<A>
where
    A: Eq + Hash,
{
    /// Returns the number of per-actor entries carried by this delta.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the delta carries no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the delta carries an entry for `actor`.
    #[must_use]
    pub fn contains_actor(&self, actor: &A) -> bool {
        self.entries.contains_key(actor)
    }
}

impl<A> DeltaCrdt for GCounter<A>
where
    A: Clone + Eq + Hash,
{
    type State = VersionVector<A>;
    type Delta = GCounterDelta<A>;

    fn state(&self) -> VersionVector<A> {
        let mut vector = VersionVector::new();
        for (actor, entry) in &self.entries {
            vector.observe(actor.clone(), entry.clock);
        }
        vector
    }

    fn delta(&self, remote: Option<&VersionVector<A>>) -> Option<GCounterDelta<A>> {
        let entries: HashMap<A, CounterEntry> = self
            .entries
            .iter()
            .filter(|&(actor, entry)| remote.map_or(true, |r| r.get(actor) < entry.clock))
            .map(|(actor, entry)| (actor.clone(), *entry))
            .collect();

        if entries.is_empty() {
            None
        } else {
            Some(GCounterDelta { entries })
        }
    }

    fn merge_delta(&mut self, delta: &GCounterDelta<A>) -> CrdtResult<()> {
        let mut max_seen = self.clock.clock();
        for (actor, incoming) in &delta.entries {
            max_seen = max_seen.max(incoming.clock);
            match self.entries.get_mut(actor) {
                Some(local) => {
                    if local.superseded_by(incoming) {
                        *local = *incoming;
                    }
                }
                None => {
                    self.entries.insert(actor.clone(), *incoming);
                }
            }
        }
        // Subsequent local operations must order after everything observed.
        self.clock.observe(max_seen);
        Ok(())
    }
}

impl<A> PartialEq for GCounter<A>
where
    A: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        // Counters are equal if all per-actor entries match; the local
        // clock identity is replica-specific bookkeeping, not state.
        let all_actors: std::collections::HashSet<&A> =
            self.entries.keys().chain(other.entries.keys()).collect();

        all_actors.into_iter().all(|actor| {
            self.entries.get(actor).copied().unwrap_or(CounterEntry::ZERO)
                == other.entries.get(actor).copied().unwrap_or(CounterEntry::ZERO)
        })
    }
}

impl<A> Eq for GCounter<A> where A: Eq + Hash {}
