//! Deterministic symmetric pair-key derivation
//!
//! A connection between two users — and likewise the DM thread between them —
//! needs exactly one key, and both sides must be able to compute it without
//! asking anyone. `pair_uuid` maps an *unordered* pair of UUIDs to a single
//! UUID: canonical ordering first, then a namespaced SHA-256 over the two
//! textual forms, truncated into a version-8 UUID.
//!
//! Properties callers rely on:
//!
//! - **Symmetric**: `pair_uuid(a, b) == pair_uuid(b, a)`.
//! - **Deterministic**: no random seed, stable across processes, platforms
//!   and releases. Stored keys depend on this.
//! - **Total**: defined for every input pair, including `a == b`. Rejecting
//!   self-pairs is a policy question and lives with callers
//!   ([`Connection::request`](crate::connection::Connection::request)); the
//!   derivation itself never fails.
//!
//! The namespace constants version the scheme. If the canonical textual form
//! of UUIDs ever changed shape, new namespaces would be minted rather than
//! altering the derivation under existing keys.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::id::{ConnectionId, ConversationId, UserId};

/// Namespace for connection keys.
///
/// Frozen: every stored connection key was derived under this value.
pub const PAIR_NAMESPACE: Uuid = Uuid::from_u128(0xf1bb2e51_5286_4dc6_b28a_4584778c1170);

/// Namespace for direct-message thread keys.
///
/// Distinct from [`PAIR_NAMESPACE`] so a thread key can never be mistaken
/// for a connection key even though both derive from the same user pair.
pub const DM_THREAD_NAMESPACE: Uuid = Uuid::from_u128(0xebbe4ecc_50a1_4dc6_93a9_db683df0b789);

/// Derive the canonical pair key for two UUIDs under a caller-chosen
/// namespace.
///
/// The two inputs are ordered by their byte representation, which for UUIDs
/// coincides exactly with lexicographic order of the canonical lowercase
/// hyphenated text (fixed length, hyphens in fixed positions, hex digits in
/// ASCII order). The smaller-then-larger texts are hashed with the namespace
/// as a prefix and the first 128 digest bits become the output, with the
/// RFC 9562 version-8 and variant bits set by [`Uuid::new_v8`].
pub fn pair_uuid_in(namespace: Uuid, a: Uuid, b: Uuid) -> Uuid {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    // The two canonical texts are concatenated with no separator. Safe only
    // because the canonical form is fixed-length (36 bytes); revisit via a
    // new namespace if that ever stops being true.
    let mut buf = Uuid::encode_buffer();
    hasher.update(lo.hyphenated().encode_lower(&mut buf).as_bytes());
    hasher.update(hi.hyphenated().encode_lower(&mut buf).as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::new_v8(bytes)
}

/// Derive the canonical connection key for an unordered pair of UUIDs.
///
/// Shorthand for [`pair_uuid_in`] under [`PAIR_NAMESPACE`].
pub fn pair_uuid(a: Uuid, b: Uuid) -> Uuid {
    pair_uuid_in(PAIR_NAMESPACE, a, b)
}

impl ConnectionId {
    /// Canonical key for the connection between two users.
    ///
    /// Symmetric in its arguments: both sides of a relationship compute the
    /// same id.
    pub fn between(a: &UserId, b: &UserId) -> Self {
        Self::from_uuid(pair_uuid(a.uuid(), b.uuid()))
    }
}

impl ConversationId {
    /// Canonical key for the direct-message thread between two users.
    ///
    /// Derived under [`DM_THREAD_NAMESPACE`], so it never collides with the
    /// connection key for the same pair.
    pub fn direct(a: &UserId, b: &UserId) -> Self {
        Self::from_uuid(pair_uuid_in(DM_THREAD_NAMESPACE, a.uuid(), b.uuid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fixture_pair() -> (Uuid, Uuid) {
        (
            Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap(),
            Uuid::parse_str("22222222-2222-2222-2222-222222222222").unwrap(),
        )
    }

    // Pinned output. If this test ever fails, the derivation changed and
    // every stored connection key is orphaned — do not "fix" the constant.
    #[test]
    fn test_pair_uuid_golden_vector() {
        let (a, b) = fixture_pair();
        let expected = Uuid::parse_str("acfd2c16-baef-8738-bb2d-fad44c82799e").unwrap();

        assert_eq!(pair_uuid(a, b), expected);
        assert_eq!(pair_uuid(b, a), expected);
    }

    #[test]
    fn test_pair_uuid_self_pair_is_total_and_stable() {
        let (a, b) = fixture_pair();
        let expected = Uuid::parse_str("ed4f931e-636c-84a3-b0a1-ff11957bbc77").unwrap();

        // No special case: (a, a) is just another pair
        assert_eq!(pair_uuid(a, a), expected);
        assert_ne!(pair_uuid(a, a), pair_uuid(a, b));
    }

    #[test]
    fn test_dm_thread_golden_vector() {
        let (a, b) = fixture_pair();
        let expected = Uuid::parse_str("1151be6d-b4b3-8835-aa38-107f1bc3ba8d").unwrap();

        assert_eq!(pair_uuid_in(DM_THREAD_NAMESPACE, a, b), expected);
    }

    #[test]
    fn test_namespaces_never_overlap() {
        let (a, b) = fixture_pair();
        assert_ne!(pair_uuid(a, b), pair_uuid_in(DM_THREAD_NAMESPACE, a, b));
    }

    #[test]
    fn test_typed_wrappers_match_raw_derivation() {
        let user_a = UserId::generate();
        let user_b = UserId::generate();

        let conn = ConnectionId::between(&user_a, &user_b);
        assert_eq!(conn.uuid(), pair_uuid(user_a.uuid(), user_b.uuid()));
        assert_eq!(conn, ConnectionId::between(&user_b, &user_a));

        let thread = ConversationId::direct(&user_a, &user_b);
        assert_eq!(thread, ConversationId::direct(&user_b, &user_a));
        assert_ne!(thread.uuid(), conn.uuid());
    }

    #[test]
    fn test_output_is_version_8_rfc_variant() {
        let (a, b) = fixture_pair();
        let id = pair_uuid(a, b);

        assert_eq!(id.get_version_num(), 8);
        assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
    }
}
