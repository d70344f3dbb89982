//! Tether Core - Social Graph and Messaging Domain
//!
//! This crate holds the domain types and pure logic behind Tether's
//! social features: the symmetric pair-identifier derivation that keys
//! connections and direct-message threads, the records built on top of
//! it, and the policies (OTP, story expiry) those records follow.

pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod id;
pub mod message;
pub mod otp;
pub mod pairing;
pub mod reaction;
pub mod story;
pub mod users;
pub mod utils;

// Macros are automatically available at crate root due to #[macro_export]

pub use config::{StoryConfig, TetherConfig, load_config, save_config};
pub use connection::{Connection, ConnectionStatus, ConnectionStore};
pub use error::{CoreError, Result};
pub use id::{
    ConnectionId, ConversationId, Id, IdError, IdType, MessageId, OtpId, ReactionId, StoryId,
    UserId,
};
pub use message::{DeliveryState, DirectMessage, MessageKind};
pub use otp::{OtpChallenge, OtpOutcome, OtpPolicy, OtpPurpose};
pub use pairing::{DM_THREAD_NAMESPACE, PAIR_NAMESPACE, pair_uuid, pair_uuid_in};
pub use reaction::{Reaction, ReactionKind, ReactionTarget};
pub use story::{Story, StoryAudience, StoryMedia};
pub use users::{Presence, User, validate_username};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        Connection, ConnectionId, ConnectionStatus, ConnectionStore, ConversationId, CoreError,
        DeliveryState, DirectMessage, Id, IdType, MessageId, MessageKind, OtpChallenge, OtpOutcome,
        OtpPolicy, OtpPurpose, Reaction, ReactionKind, ReactionTarget, Result, Story,
        StoryAudience, StoryMedia, TetherConfig, User, UserId, pair_uuid,
    };
}
