use converge_types::ReplicaId;
use std::collections::HashSet;
use std::str::FromStr;

#[test]
fn replica_id_new_is_unique() {
    let a = ReplicaId::new();
    let b = ReplicaId::new();
    assert_ne!(a, b);
}

#[test]
fn replica_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let id = ReplicaId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), uuid);
}

#[test]
fn replica_id_display_and_parse() {
    let id = ReplicaId::new();
    let s = id.to_string();
    let parsed = ReplicaId::parse(&s).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn replica_id_from_str() {
    let id = ReplicaId::new();
    let s = id.to_string();
    let parsed: ReplicaId = ReplicaId::from_str(&s).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn replica_id_parse_invalid() {
    assert!(ReplicaId::parse("not-a-uuid").is_err());
}

#[test]
fn replica_id_from_str_invalid() {
    assert!(ReplicaId::from_str("garbage").is_err());
}

#[test]
fn replica_id_default_is_unique() {
    let a = ReplicaId::default();
    let b = ReplicaId::default();
    assert_ne!(a, b);
}

#[test]
fn replica_id_hash_and_eq() {
    let id = ReplicaId::new();
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    assert_eq!(set.len(), 1);
}

#[test]
fn replica_id_is_totally_ordered() {
    // Fixed byte patterns so the order is known in advance.
    let lo = ReplicaId::from_uuid(uuid::Uuid::from_bytes([1; 16]));
    let hi = ReplicaId::from_uuid(uuid::Uuid::from_bytes([2; 16]));
    assert!(lo < hi);
    assert_eq!(lo.max(hi), hi);
}

#[test]
fn replica_id_serialization_roundtrip() {
    let id = ReplicaId::new();
    let json = serde_json::to_string(&id).unwrap();
    let parsed: ReplicaId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn replica_id_serializes_transparently() {
    let id = ReplicaId::new();
    let json = serde_json::to_string(&id).unwrap();
    // A bare UUID string, not a wrapping object.
    assert!(json.starts_with('"'));
}
