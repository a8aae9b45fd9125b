//! Lamport timestamps for causal ordering.
//!
//! A Lamport timestamp pairs a logical clock with the identity of the
//! replica that produced it. Because the pair is ordered by clock first and
//! actor second, any two timestamps are comparable, and two replicas with
//! distinct actor ids can never produce equal timestamps for distinct
//! events.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A Lamport timestamp: a logical clock paired with the authoring actor.
///
/// Within one replica the clock strictly increases with every observable
/// operation, so `ts(o1) < ts(o2)` whenever `o1` happens-before `o2` on
/// that replica. Across replicas the `(clock, actor)` order provides a
/// deterministic tie-break for concurrent events.
///
/// The clock saturates at `u64::MAX` rather than wrapping; the actor is
/// fixed at construction and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LamportTimestamp<A> {
    clock: u64,
    actor: A,
}

impl<A> LamportTimestamp<A> {
    /// Creates a timestamp from components.
    #[must_use]
    pub const fn new(clock: u64, actor: A) -> Self {
        Self { clock, actor }
    }

    /// Returns the logical clock component.
    #[must_use]
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Returns the authoring actor.
    #[must_use]
    pub const fn actor(&self) -> &A {
        &self.actor
    }

    /// Advances the clock by one, saturating at `u64::MAX`.
    pub fn tick(&mut self) {
        self.clock = self.clock.saturating_add(1);
    }

    /// Advances the clock to at least `clock`.
    ///
    /// Used when folding in remote state so that subsequent local
    /// operations order strictly after everything observed. The actor is
    /// unaffected.
    pub fn observe(&mut self, clock: u64) {
        if clock > self.clock {
            self.clock = clock;
        }
    }
}

impl<A: Ord> PartialOrd for LamportTimestamp<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: Ord> Ord for LamportTimestamp<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.clock.cmp(&other.clock) {
            Ordering::Equal => self.actor.cmp(&other.actor),
            ordering => ordering,
        }
    }
}
