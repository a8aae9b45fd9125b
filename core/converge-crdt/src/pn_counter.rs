//! Positive-negative counter CRDT.
//!
//! A PN-Counter supports both increment and decrement by composing two
//! grow-only counters: one for increments, one for decrements. The value
//! is the difference of the two. Merge stays commutative, associative,
//! and idempotent because both components are.
//!
//! The observable value uses signed saturating arithmetic: each component
//! sum is clamped to `i64::MAX` before the subtraction, and the
//! subtraction itself saturates at the `i64` bounds. Decrementing a
//! counter holding `i64::MIN` therefore reads back as `i64::MIN + 1`.

use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::CrdtResult;
use crate::gcounter::{GCounter, GCounterDelta};
use crate::traits::{DeltaCrdt, Replicable};
use crate::version_vector::VersionVector;

/// A positive-negative counter.
///
/// Both embedded counters share the same actor id; increments tick the
/// positive component's clock, decrements the negative component's.
///
/// # Example
///
/// ```
/// use converge_crdt::{PNCounter, Replicable};
///
/// let mut a = PNCounter::new("A");
/// a.increment();
/// a.increment();
///
/// let mut b = PNCounter::new("B");
/// b.decrement();
///
/// assert_eq!(a.merged(&b).value(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PNCounter<A>
where
    A: Eq + Hash,
{
    pos: GCounter<A>,
    neg: GCounter<A>,
}

impl<A> PNCounter<A>
where
    A: Clone + Eq + Hash,
{
    /// Creates a counter owned by `actor`, starting at 0.
    #[must_use]
    pub fn new(actor: A) -> Self {
        Self {
            pos: GCounter::new(actor.clone()),
            neg: GCounter::new(actor),
        }
    }

    /// Creates a counter owned by `actor`, starting at `initial`.
    #[must_use]
    pub fn with_value(initial: i64, actor: A) -> Self {
        let mut counter = Self::new(actor);
        if initial > 0 {
            counter.pos.increment_by(initial as u64);
        } else if initial < 0 {
            counter.neg.increment_by(initial.unsigned_abs());
        }
        counter
    }

    /// Returns the actor that owns this replica of the counter.
    #[must_use]
    pub fn actor(&self) -> &A {
        self.pos.actor()
    }

    /// Increments the counter by 1.
    pub fn increment(&mut self) {
        self.pos.increment();
    }

    /// Increments the counter by `amount`.
    pub fn increment_by(&mut self, amount: u64) {
        self.pos.increment_by(amount);
    }

    /// Decrements the counter by 1.
    pub fn decrement(&mut self) {
        self.neg.increment();
    }

    /// Decrements the counter by `amount`.
    pub fn decrement_by(&mut self, amount: u64) {
        self.neg.increment_by(amount);
    }

    /// Returns the current value, saturating at the `i64` bounds.
    #[must_use]
    pub fn value(&self) -> i64 {
        let pos = clamp_to_i64(self.pos.value());
        let neg = clamp_to_i64(self.neg.value());
        pos.saturating_sub(neg)
    }
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl<A> Replicable for PNCounter<A>
where
    A: Clone + Eq + Hash,
{
    fn merge(&mut self, other: &Self) {
        self.pos.merge(&other.pos);
        self.neg.merge(&other.neg);
    }
}

/// Summary state for [`PNCounter`]: one vector per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PNCounterState<A>
where
    A: Eq + Hash,
{
    pos: VersionVector<A>,
    neg: VersionVector<A>,
}

impl<A> PNCounterState<A>
where
    A: Eq + Hash,
{
    /// Summary of the positive component.
    #[must_use]
    pub fn pos(&self) -> &VersionVector<A> {
        &self.pos
    }

    /// Summary of the negative component.
    #[must_use]
    pub fn neg(&self) -> &VersionVector<A> {
        &self.neg
    }
}

/// Delta for [`PNCounter`]: component-wise counter deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PNCounterDelta<A>
where
    A: Eq + Hash,
{
    pos: Option<GCounterDelta<A>>,
    neg: Option<GCounterDelta<A>>,
}

impl<A> DeltaCrdt for PNCounter<A>
where
    A: Clone + Eq + Hash,
{
    type State = PNCounterState<A>;
    type Delta = PNCounterDelta<A>;

    fn state(&self) -> PNCounterState<A> {
        PNCounterState {
            pos: self.pos.state(),
            neg: self.neg.state(),
        }
    }

    fn delta(&self, remote: Option<&PNCounterState<A>>) -> Option<PNCounterDelta<A>> {
        let pos = self.pos.delta(remote.map(|s| &s.pos));
        let neg = self.neg.delta(remote.map(|s| &s.neg));
        if pos.is_none() && neg.is_none() {
            None
        } else {
            Some(PNCounterDelta { pos, neg })
        }
    }

    fn merge_delta(&mut self, delta: &PNCounterDelta<A>) -> CrdtResult<()> {
        if let Some(pos) = &delta.pos {
            self.pos.merge_delta(pos)?;
        }
        if let Some(neg) = &delta.neg {
            self.neg.merge_delta(neg)?;
        }
        Ok(())
    }
}
