//! API response types
//!
//! The encode half of the wire mapping: each response is built from its
//! domain record by an explicit `From` conversion, field by field. Domain
//! types never serialize straight onto the wire, so internal fields (an
//! OTP challenge's code, above all) cannot leak by accident.

use serde::{Deserialize, Serialize};
use tether_core::{
    connection::{Connection, ConnectionStatus},
    id::{ConnectionId, ConversationId, MessageId, OtpId, ReactionId, StoryId, UserId},
    message::{DeliveryState, DirectMessage, MessageKind},
    otp::{OtpChallenge, OtpOutcome, OtpPurpose},
    reaction::{Reaction, ReactionKind, ReactionTarget},
    story::{Story, StoryAudience, StoryMedia},
    users::{Presence, User},
};

/// User response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub presence: Presence,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            email: user.email,
            presence: user.presence,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Connection response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionResponse {
    pub id: ConnectionId,
    pub participants: [UserId; 2],
    pub requested_by: UserId,
    pub status: ConnectionStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Connection> for ConnectionResponse {
    fn from(connection: Connection) -> Self {
        Self {
            id: connection.id,
            participants: connection.participants,
            requested_by: connection.requested_by,
            status: connection.status,
            created_at: connection.created_at,
            updated_at: connection.updated_at,
        }
    }
}

/// Direct message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectMessageResponse {
    pub id: MessageId,
    pub conversation: ConversationId,
    pub sender: UserId,
    pub recipient: UserId,
    pub kind: MessageKind,
    pub body: String,
    pub state: DeliveryState,
    pub sent_at: chrono::DateTime<chrono::Utc>,
    pub state_changed_at: chrono::DateTime<chrono::Utc>,
}

impl From<DirectMessage> for DirectMessageResponse {
    fn from(message: DirectMessage) -> Self {
        Self {
            id: message.id,
            conversation: message.conversation,
            sender: message.sender,
            recipient: message.recipient,
            kind: message.kind,
            body: message.body,
            state: message.state,
            sent_at: message.sent_at,
            state_changed_at: message.state_changed_at,
        }
    }
}

/// Story response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryResponse {
    pub id: StoryId,
    pub author: UserId,
    pub media: StoryMedia,
    pub audience: StoryAudience,
    pub caption: Option<String>,
    pub posted_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl From<Story> for StoryResponse {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            author: story.author,
            media: story.media,
            audience: story.audience,
            caption: story.caption,
            posted_at: story.posted_at,
            expires_at: story.expires_at,
        }
    }
}

/// Reaction response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub id: ReactionId,
    pub by: UserId,
    pub target: ReactionTarget,
    pub kind: ReactionKind,
    pub reacted_at: chrono::DateTime<chrono::Utc>,
}

impl From<Reaction> for ReactionResponse {
    fn from(reaction: Reaction) -> Self {
        Self {
            id: reaction.id,
            by: reaction.by,
            target: reaction.target,
            kind: reaction.kind,
            reacted_at: reaction.reacted_at,
        }
    }
}

/// Acknowledgement that a verification code was issued.
///
/// Deliberately carries everything about the challenge *except* the code;
/// the code travels by the delivery channel, never by this API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpIssuedResponse {
    pub id: OtpId,
    pub user: UserId,
    pub purpose: OtpPurpose,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub resend_available_at: chrono::DateTime<chrono::Utc>,
}

impl From<&OtpChallenge> for OtpIssuedResponse {
    fn from(challenge: &OtpChallenge) -> Self {
        Self {
            id: challenge.id,
            user: challenge.user,
            purpose: challenge.purpose,
            expires_at: challenge.expires_at,
            resend_available_at: challenge.resend_available_at,
        }
    }
}

/// Result of a verification attempt, for callers that prefer a 200 with a
/// status over an error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerifyResponse {
    pub verified: bool,
    /// Wrong guesses left, present only after a mismatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<u32>,
}

impl From<OtpOutcome> for OtpVerifyResponse {
    fn from(outcome: OtpOutcome) -> Self {
        match outcome {
            OtpOutcome::Verified => Self {
                verified: true,
                remaining_attempts: None,
            },
            OtpOutcome::Mismatch { remaining } => Self {
                verified: false,
                remaining_attempts: Some(remaining),
            },
            OtpOutcome::Expired | OtpOutcome::Exhausted => Self {
                verified: false,
                remaining_attempts: None,
            },
        }
    }
}
