//! Core traits implemented by every CRDT in this crate.

use crate::error::CrdtResult;

/// State-based replication.
///
/// A `Replicable` value can fold in the full state of another replica.
/// After merging, `self` contains the least upper bound of both states.
///
/// # Properties
///
/// All implementations must satisfy:
/// - **Commutativity:** `a.merged(b) == b.merged(a)`
/// - **Associativity:** `a.merged(b.merged(c)) == a.merged(b).merged(c)`
/// - **Idempotency:** `a.merged(a) == a`
///
/// Merging never fails: ties are resolved deterministically by the
/// higher Lamport timestamp.
pub trait Replicable: Clone {
    /// Merge another replica's state into this one.
    fn merge(&mut self, other: &Self);

    /// Returns a new value that is the merge of this and another.
    #[must_use]
    fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }
}

/// Delta-state replication.
///
/// A `DeltaCrdt` can summarize what it has seen (`state`) and produce a
/// compact delta containing only what a remote replica is missing,
/// instead of shipping the full state on every exchange.
///
/// # Example
///
/// ```
/// use converge_crdt::{DeltaCrdt, GCounter};
///
/// let mut a = GCounter::new("a");
/// a.increment();
/// a.increment();
///
/// let mut b = GCounter::new("b");
/// b.increment();
///
/// // Ship only the entries `b` cannot have seen yet.
/// let delta = a.delta(Some(&b.state())).expect("a has news for b");
/// b.merge_delta(&delta)?;
/// assert_eq!(b.value(), 3);
/// # Ok::<(), converge_crdt::CrdtError>(())
/// ```
pub trait DeltaCrdt: Replicable {
    /// Compact summary of everything this replica has observed,
    /// derivable in time linear in the metadata size.
    type State;

    /// The type of delta produced by this CRDT.
    type Delta;

    /// Returns the per-actor summary of this replica's state.
    #[must_use]
    fn state(&self) -> Self::State;

    /// Returns the entries a remote replica at `remote` cannot have seen.
    ///
    /// `None` input means "send everything"; `None` output means
    /// "nothing to send".
    #[must_use]
    fn delta(&self, remote: Option<&Self::State>) -> Option<Self::Delta>;

    /// Folds a delta into this replica's state.
    ///
    /// For non-conflicting histories this is observably equivalent to
    /// [`Replicable::merge`] with the state that produced the delta.
    /// Unlike `merge`, it can fail with
    /// [`CrdtError::ConflictingHistory`](crate::CrdtError::ConflictingHistory)
    /// when an incoming entry carries the same timestamp as a local entry
    /// but different metadata — a case `merge` resolves silently by
    /// higher-timestamp selection. On error, no entry of the delta has
    /// been applied.
    fn merge_delta(&mut self, delta: &Self::Delta) -> CrdtResult<()>;
}
