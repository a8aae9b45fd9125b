//! Per-actor clock summaries.
//!
//! A version vector records, for each actor, the highest Lamport clock
//! observed anywhere in a CRDT's metadata. It is the `State` half of the
//! delta protocol: a replica publishes its vector, and a peer answers with
//! only the entries whose clocks exceed it.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Causality relationship between two version vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CausalOrder {
    /// First vector happened before second.
    Before,
    /// First vector happened after second.
    After,
    /// Vectors are concurrent (neither happened before the other).
    Concurrent,
    /// Vectors are identical.
    Equal,
}

/// A per-actor summary of the highest Lamport clocks a replica has seen.
///
/// Missing actors are treated as clock 0, so two vectors compare by their
/// pointwise clocks regardless of which actors they happen to mention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionVector<A>
where
    A: Eq + Hash,
{
    /// Map from actor to the highest clock observed for that actor.
    clocks: HashMap<A, u64>,
}

impl<A> VersionVector<A>
where
    A: Eq + Hash,
{
    /// Creates a new empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clocks: HashMap::new(),
        }
    }

    /// Returns the clock recorded for an actor (0 if not present).
    #[must_use]
    pub fn get(&self, actor: &A) -> u64 {
        self.clocks.get(actor).copied().unwrap_or(0)
    }

    /// Records a clock for an actor, keeping the maximum.
    pub fn observe(&mut self, actor: A, clock: u64) {
        let entry = self.clocks.entry(actor).or_insert(0);
        if clock > *entry {
            *entry = clock;
        }
    }

    /// Returns all actors and their clocks.
    pub fn iter(&self) -> impl Iterator<Item = (&A, u64)> {
        self.clocks.iter().map(|(actor, &clock)| (actor, clock))
    }

    /// Returns the number of actors in the vector.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// Returns true if the vector has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    /// Compares this vector with another to determine causal ordering.
    #[must_use]
    pub fn compare(&self, other: &Self) -> CausalOrder {
        let mut dominated_by_self = true; // self >= other for all actors
        let mut dominated_by_other = true; // other >= self for all actors

        let all_actors: HashSet<&A> = self.clocks.keys().chain(other.clocks.keys()).collect();

        for actor in all_actors {
            let self_clock = self.get(actor);
            let other_clock = other.get(actor);

            if self_clock < other_clock {
                dominated_by_self = false;
            }
            if other_clock < self_clock {
                dominated_by_other = false;
            }
        }

        match (dominated_by_self, dominated_by_other) {
            (true, true) => CausalOrder::Equal,
            (true, false) => CausalOrder::After,
            (false, true) => CausalOrder::Before,
            (false, false) => CausalOrder::Concurrent,
        }
    }

    /// Returns true if this vector dominates the other (is >= pointwise).
    #[must_use]
    pub fn dominates(&self, other: &Self) -> bool {
        matches!(self.compare(other), CausalOrder::After | CausalOrder::Equal)
    }
}

impl<A> VersionVector<A>
where
    A: Clone + Eq + Hash,
{
    /// Merges another vector into this one, taking the pointwise maximum.
    pub fn merge(&mut self, other: &Self) {
        for (actor, &clock) in &other.clocks {
            self.observe(actor.clone(), clock);
        }
    }

    /// Returns a new vector that is the merge of this and another.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

impl<A> Default for VersionVector<A>
where
    A: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> PartialEq for VersionVector<A>
where
    A: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == CausalOrder::Equal
    }
}

impl<A> Eq for VersionVector<A> where A: Eq + Hash {}
