//! Deterministic cache-key derivation.
//!
//! Every stored artifact gets its key from one of these builders so the
//! namespace stays consistent across services. Keys are plain strings of
//! the shape `tether:<kind>:<id>[...]`; tests pin the exact layout because
//! previously written entries depend on it.

use compact_str::{CompactString, format_compact};

use crate::id::{ConnectionId, ConversationId, StoryId, UserId};
use crate::otp::OtpPurpose;
use crate::reaction::ReactionTarget;

/// Root namespace shared by every key
pub const PREFIX: &str = "tether";

/// Key for a user's profile record
pub fn user_profile(user: &UserId) -> CompactString {
    format_compact!("{PREFIX}:user:{}", user.uuid())
}

/// Key for the set of connection ids a user participates in
pub fn user_connections(user: &UserId) -> CompactString {
    format_compact!("{PREFIX}:user:{}:connections", user.uuid())
}

/// Key for a connection record
pub fn connection(id: &ConnectionId) -> CompactString {
    format_compact!("{PREFIX}:conn:{}", id.uuid())
}

/// Key for a direct-message thread
pub fn dm_thread(id: &ConversationId) -> CompactString {
    format_compact!("{PREFIX}:dm:{}", id.uuid())
}

/// Key for a story record
pub fn story(id: &StoryId) -> CompactString {
    format_compact!("{PREFIX}:story:{}", id.uuid())
}

/// Key for a user's outstanding verification code for one purpose.
///
/// Purpose comes before the user so all codes of one purpose share a
/// scan prefix.
pub fn otp(user: &UserId, purpose: OtpPurpose) -> CompactString {
    format_compact!("{PREFIX}:otp:{}:{}", purpose, user.uuid())
}

/// Uniqueness key for a reaction: one entry per user per target
pub fn reaction(by: &UserId, target: &ReactionTarget) -> CompactString {
    format_compact!(
        "{PREFIX}:react:{}:{}:{}",
        target.kind_name(),
        target.uuid(),
        by.uuid()
    )
}
