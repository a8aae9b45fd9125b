//! Property-based tests for CRDT correctness.
//!
//! These tests verify the fundamental mathematical properties that all
//! CRDTs must satisfy:
//! - Commutativity: merge(A, B) == merge(B, A)
//! - Associativity: merge(merge(A, B), C) == merge(A, merge(B, C))
//! - Idempotence: merge(A, A) == A
//!
//! Additionally, we verify that delta synchronization against a remote
//! summary is observably equivalent to a full-state merge.

use converge_crdt::{DeltaCrdt, GCounter, ORMap, ORSet, PNCounter, Replicable};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

/// Insert (true) or remove (false) of a small value.
fn set_ops() -> impl Strategy<Value = Vec<(bool, u8)>> {
    prop::collection::vec((any::<bool>(), 0u8..8), 0..24)
}

/// Assign (true) or remove (false) of a small key, with a value.
fn map_ops() -> impl Strategy<Value = Vec<(bool, u8, i32)>> {
    prop::collection::vec((any::<bool>(), 0u8..8, -100i32..100), 0..24)
}

fn counter_ops() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..1000, 0..16)
}

fn pn_ops() -> impl Strategy<Value = Vec<(bool, u64)>> {
    prop::collection::vec((any::<bool>(), 0u64..1000), 0..16)
}

fn orset_replica(actor: &'static str, ops: &[(bool, u8)]) -> ORSet<&'static str, u8> {
    let mut set = ORSet::new(actor);
    for (insert, value) in ops {
        if *insert {
            set.insert(*value);
        } else {
            set.remove(value);
        }
    }
    set
}

fn ormap_replica(actor: &'static str, ops: &[(bool, u8, i32)]) -> ORMap<&'static str, u8, i32> {
    let mut map = ORMap::new(actor);
    for (assign, key, value) in ops {
        if *assign {
            map.insert(*key, *value);
        } else {
            map.remove(key);
        }
    }
    map
}

fn gcounter_replica(actor: &'static str, ops: &[u64]) -> GCounter<&'static str> {
    let mut counter = GCounter::new(actor);
    for amount in ops {
        counter.increment_by(*amount);
    }
    counter
}

fn pncounter_replica(actor: &'static str, ops: &[(bool, u64)]) -> PNCounter<&'static str> {
    let mut counter = PNCounter::new(actor);
    for (up, amount) in ops {
        if *up {
            counter.increment_by(*amount);
        } else {
            counter.decrement_by(*amount);
        }
    }
    counter
}

/// Delta-sync `from` into `to` and assert it matches the full merge.
fn assert_delta_matches_merge<C>(to: &C, from: &C)
where
    C: DeltaCrdt + PartialEq + std::fmt::Debug,
{
    let full = to.merged(from);
    let mut via_delta = to.clone();
    if let Some(delta) = from.delta(Some(&to.state())) {
        via_delta
            .merge_delta(&delta)
            .expect("histories from distinct actors cannot conflict");
    }
    assert_eq!(full, via_delta);
}

// =============================================================================
// GCOUNTER PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn gcounter_merge_is_commutative(a_ops in counter_ops(), b_ops in counter_ops()) {
        let a = gcounter_replica("A", &a_ops);
        let b = gcounter_replica("B", &b_ops);
        prop_assert_eq!(a.merged(&b), b.merged(&a));
    }

    #[test]
    fn gcounter_merge_is_associative(
        a_ops in counter_ops(),
        b_ops in counter_ops(),
        c_ops in counter_ops(),
    ) {
        let a = gcounter_replica("A", &a_ops);
        let b = gcounter_replica("B", &b_ops);
        let c = gcounter_replica("C", &c_ops);
        prop_assert_eq!(a.merged(&b).merged(&c), a.merged(&b.merged(&c)));
    }

    #[test]
    fn gcounter_merge_is_idempotent(a_ops in counter_ops(), b_ops in counter_ops()) {
        let a = gcounter_replica("A", &a_ops);
        let b = gcounter_replica("B", &b_ops);
        let once = a.merged(&b);
        prop_assert_eq!(once.merged(&b), once.clone());
        prop_assert_eq!(a.merged(&a), a);
    }

    #[test]
    fn gcounter_value_is_monotone_under_merge(a_ops in counter_ops(), b_ops in counter_ops()) {
        let a = gcounter_replica("A", &a_ops);
        let b = gcounter_replica("B", &b_ops);
        let merged = a.merged(&b);
        prop_assert!(merged.value() >= a.value());
        prop_assert!(merged.value() >= b.value());
    }

    #[test]
    fn gcounter_delta_matches_merge(a_ops in counter_ops(), b_ops in counter_ops()) {
        let a = gcounter_replica("A", &a_ops);
        let b = gcounter_replica("B", &b_ops);
        assert_delta_matches_merge(&a, &b);
    }

    #[test]
    fn gcounter_delta_against_own_state_is_none(a_ops in counter_ops()) {
        let a = gcounter_replica("A", &a_ops);
        prop_assert!(a.delta(Some(&a.state())).is_none());
    }
}

// =============================================================================
// PNCOUNTER PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn pncounter_merge_is_commutative(a_ops in pn_ops(), b_ops in pn_ops()) {
        let a = pncounter_replica("A", &a_ops);
        let b = pncounter_replica("B", &b_ops);
        prop_assert_eq!(a.merged(&b), b.merged(&a));
    }

    #[test]
    fn pncounter_merge_is_associative(
        a_ops in pn_ops(),
        b_ops in pn_ops(),
        c_ops in pn_ops(),
    ) {
        let a = pncounter_replica("A", &a_ops);
        let b = pncounter_replica("B", &b_ops);
        let c = pncounter_replica("C", &c_ops);
        prop_assert_eq!(a.merged(&b).merged(&c), a.merged(&b.merged(&c)));
    }

    #[test]
    fn pncounter_merge_is_idempotent(a_ops in pn_ops()) {
        let a = pncounter_replica("A", &a_ops);
        prop_assert_eq!(a.merged(&a), a);
    }

    #[test]
    fn pncounter_merged_value_is_sum_of_disjoint_replicas(a_ops in pn_ops(), b_ops in pn_ops()) {
        let a = pncounter_replica("A", &a_ops);
        let b = pncounter_replica("B", &b_ops);
        prop_assert_eq!(a.merged(&b).value(), a.value() + b.value());
    }

    #[test]
    fn pncounter_delta_matches_merge(a_ops in pn_ops(), b_ops in pn_ops()) {
        let a = pncounter_replica("A", &a_ops);
        let b = pncounter_replica("B", &b_ops);
        assert_delta_matches_merge(&a, &b);
    }
}

// =============================================================================
// ORSET PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn orset_merge_is_commutative(a_ops in set_ops(), b_ops in set_ops()) {
        let a = orset_replica("A", &a_ops);
        let b = orset_replica("B", &b_ops);
        prop_assert_eq!(a.merged(&b), b.merged(&a));
    }

    #[test]
    fn orset_merge_is_associative(
        a_ops in set_ops(),
        b_ops in set_ops(),
        c_ops in set_ops(),
    ) {
        let a = orset_replica("A", &a_ops);
        let b = orset_replica("B", &b_ops);
        let c = orset_replica("C", &c_ops);
        prop_assert_eq!(a.merged(&b).merged(&c), a.merged(&b.merged(&c)));
    }

    #[test]
    fn orset_merge_is_idempotent(a_ops in set_ops(), b_ops in set_ops()) {
        let a = orset_replica("A", &a_ops);
        let b = orset_replica("B", &b_ops);
        let once = a.merged(&b);
        prop_assert_eq!(once.merged(&b), once.clone());
        prop_assert_eq!(a.merged(&a), a);
    }

    #[test]
    fn orset_delta_matches_merge(a_ops in set_ops(), b_ops in set_ops()) {
        let a = orset_replica("A", &a_ops);
        let b = orset_replica("B", &b_ops);
        assert_delta_matches_merge(&a, &b);
    }

    #[test]
    fn orset_delta_against_own_state_is_none(a_ops in set_ops()) {
        let a = orset_replica("A", &a_ops);
        prop_assert!(a.delta(Some(&a.state())).is_none());
    }

    #[test]
    fn orset_clock_advances_with_every_observable_op(ops in set_ops()) {
        let mut set = ORSet::new("A");
        for (insert, value) in &ops {
            let before = *set.timestamp();
            let changed_metadata = if *insert {
                set.insert(*value);
                true
            } else {
                set.remove(value).is_some()
            };
            if changed_metadata {
                prop_assert!(*set.timestamp() > before);
            } else {
                prop_assert_eq!(*set.timestamp(), before);
            }
        }
    }
}

// =============================================================================
// ORMAP PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn ormap_merge_is_commutative(a_ops in map_ops(), b_ops in map_ops()) {
        let a = ormap_replica("A", &a_ops);
        let b = ormap_replica("B", &b_ops);
        prop_assert_eq!(a.merged(&b), b.merged(&a));
    }

    #[test]
    fn ormap_merge_is_associative(
        a_ops in map_ops(),
        b_ops in map_ops(),
        c_ops in map_ops(),
    ) {
        let a = ormap_replica("A", &a_ops);
        let b = ormap_replica("B", &b_ops);
        let c = ormap_replica("C", &c_ops);
        prop_assert_eq!(a.merged(&b).merged(&c), a.merged(&b.merged(&c)));
    }

    #[test]
    fn ormap_merge_is_idempotent(a_ops in map_ops()) {
        let a = ormap_replica("A", &a_ops);
        prop_assert_eq!(a.merged(&a), a);
    }

    #[test]
    fn ormap_delta_matches_merge(a_ops in map_ops(), b_ops in map_ops()) {
        let a = ormap_replica("A", &a_ops);
        let b = ormap_replica("B", &b_ops);
        assert_delta_matches_merge(&a, &b);
    }

    #[test]
    fn ormap_delta_against_own_state_is_none(a_ops in map_ops()) {
        let a = ormap_replica("A", &a_ops);
        prop_assert!(a.delta(Some(&a.state())).is_none());
    }
}
