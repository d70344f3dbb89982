//! End-to-end flows through the connection store: the derived pair key is
//! what makes every lookup here work without secondary indexes.

use tether_core::{
    ConnectionId, ConnectionStatus, ConnectionStore, ConversationId, CoreError, UserId,
};

#[test]
fn test_request_then_lookup_from_either_side() {
    let store = ConnectionStore::new();
    let wren = UserId::generate();
    let ada = UserId::generate();

    let created = store.request(&wren, &ada).unwrap();
    assert_eq!(created.status, ConnectionStatus::Pending);
    assert_eq!(created.requested_by, wren);

    // Same record regardless of who asks
    let from_wren = store.between(&wren, &ada).unwrap();
    let from_ada = store.between(&ada, &wren).unwrap();
    assert_eq!(from_wren, from_ada);
    assert_eq!(from_wren.id, ConnectionId::between(&ada, &wren));
    assert_eq!(store.get(&created.id).unwrap(), created);
}

#[test]
fn test_duplicate_request_from_either_side_conflicts() {
    let store = ConnectionStore::new();
    let wren = UserId::generate();
    let ada = UserId::generate();

    store.request(&wren, &ada).unwrap();

    assert!(matches!(
        store.request(&wren, &ada),
        Err(CoreError::AlreadyConnected { .. })
    ));
    // The reverse direction maps to the same key
    assert!(matches!(
        store.request(&ada, &wren),
        Err(CoreError::AlreadyConnected { .. })
    ));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_self_request_is_rejected_before_touching_the_store() {
    let store = ConnectionStore::new();
    let wren = UserId::generate();

    assert!(matches!(
        store.request(&wren, &wren),
        Err(CoreError::SelfConnection { .. })
    ));
    assert!(store.is_empty());
}

#[test]
fn test_accept_flow() {
    let store = ConnectionStore::new();
    let wren = UserId::generate();
    let ada = UserId::generate();

    store.request(&wren, &ada).unwrap();
    // The recipient answers in their own argument order
    let accepted = store.accept(&ada, &wren).unwrap();
    assert!(accepted.is_active());

    // Accepting twice is an invalid transition
    assert!(matches!(
        store.accept(&wren, &ada),
        Err(CoreError::InvalidTransition { .. })
    ));
}

#[test]
fn test_decline_then_block() {
    let store = ConnectionStore::new();
    let wren = UserId::generate();
    let ada = UserId::generate();

    store.request(&wren, &ada).unwrap();
    let declined = store.decline(&ada, &wren).unwrap();
    assert_eq!(declined.status, ConnectionStatus::Declined);

    // Block works from any state
    let blocked = store.block(&wren, &ada).unwrap();
    assert_eq!(blocked.status, ConnectionStatus::Blocked);
}

#[test]
fn test_operations_on_missing_connections() {
    let store = ConnectionStore::new();
    let wren = UserId::generate();
    let ada = UserId::generate();

    assert!(store.between(&wren, &ada).is_none());
    assert!(matches!(
        store.accept(&wren, &ada),
        Err(CoreError::ConnectionNotFound { .. })
    ));
    assert!(matches!(
        store.remove(&wren, &ada),
        Err(CoreError::ConnectionNotFound { .. })
    ));
}

#[test]
fn test_remove_frees_the_pair_for_a_new_request() {
    let store = ConnectionStore::new();
    let wren = UserId::generate();
    let ada = UserId::generate();

    let first = store.request(&wren, &ada).unwrap();
    let removed = store.remove(&ada, &wren).unwrap();
    assert_eq!(removed.id, first.id);
    assert!(store.between(&wren, &ada).is_none());

    // A fresh request lands on the same derived key
    let second = store.request(&ada, &wren).unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.requested_by, ada);
}

#[test]
fn test_connections_of_filters_by_participant() {
    let store = ConnectionStore::new();
    let wren = UserId::generate();
    let ada = UserId::generate();
    let kit = UserId::generate();
    let stranger = UserId::generate();

    store.request(&wren, &ada).unwrap();
    store.request(&wren, &kit).unwrap();
    store.request(&ada, &kit).unwrap();

    let of_wren = store.connections_of(&wren);
    assert_eq!(of_wren.len(), 2);
    assert!(of_wren.iter().all(|c| c.involves(&wren)));

    assert_eq!(store.connections_of(&kit).len(), 2);
    assert!(store.connections_of(&stranger).is_empty());
}

#[test]
fn test_connection_and_dm_thread_keys_never_coincide() {
    let wren = UserId::generate();
    let ada = UserId::generate();

    let connection = ConnectionId::between(&wren, &ada);
    let thread = ConversationId::direct(&wren, &ada);
    assert_ne!(connection.uuid(), thread.uuid());
}
