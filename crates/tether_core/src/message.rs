use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::id::{ConversationId, MessageId, StoryId, UserId};

/// Longest body accepted for a direct message, in characters
pub const MAX_BODY_LEN: usize = 4096;

/// What a direct message carries besides its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    /// A reply threaded off someone's story
    StoryReply { story: StoryId },
}

/// How far a message has travelled toward its recipient.
///
/// States only move forward: a message that has been read never reports
/// itself as merely delivered again.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Sent,
    Delivered,
    Read,
}

/// A single message between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectMessage {
    /// Unique identifier for this message
    pub id: MessageId,

    /// Thread this message belongs to, derived from the two participants
    pub conversation: ConversationId,

    pub sender: UserId,
    pub recipient: UserId,

    pub kind: MessageKind,

    /// Message body, at most [`MAX_BODY_LEN`] characters
    pub body: String,

    pub state: DeliveryState,

    pub sent_at: DateTime<Utc>,

    /// When the delivery state last advanced
    pub state_changed_at: DateTime<Utc>,
}

impl DirectMessage {
    /// Compose a message from `sender` to `recipient`.
    ///
    /// The conversation id comes from [`ConversationId::direct`], so both
    /// directions of the same pair land in one thread.
    pub fn send(
        sender: UserId,
        recipient: UserId,
        kind: MessageKind,
        body: impl Into<String>,
    ) -> Result<Self> {
        let body = body.into();
        let len = body.chars().count();
        if len > MAX_BODY_LEN {
            return Err(CoreError::MessageTooLong {
                len,
                max: MAX_BODY_LEN,
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: MessageId::generate(),
            conversation: ConversationId::direct(&sender, &recipient),
            sender,
            recipient,
            kind,
            body,
            state: DeliveryState::Sent,
            sent_at: now,
            state_changed_at: now,
        })
    }

    /// Advance the delivery state, returning whether anything changed.
    ///
    /// Attempts to move backwards are ignored, which makes delivery
    /// receipts safe to apply out of order.
    pub fn advance(&mut self, to: DeliveryState) -> bool {
        if to <= self.state {
            return false;
        }
        self.state = to;
        self.state_changed_at = Utc::now();
        true
    }

    pub fn mark_delivered(&mut self) -> bool {
        self.advance(DeliveryState::Delivered)
    }

    pub fn mark_read(&mut self) -> bool {
        self.advance(DeliveryState::Read)
    }

    pub fn is_read(&self) -> bool {
        self.state == DeliveryState::Read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair() -> (UserId, UserId) {
        (UserId::generate(), UserId::generate())
    }

    #[test]
    fn test_send_derives_shared_conversation() {
        let (a, b) = pair();
        let from_a = DirectMessage::send(a, b, MessageKind::Text, "hey").unwrap();
        let from_b = DirectMessage::send(b, a, MessageKind::Text, "hey yourself").unwrap();

        assert_eq!(from_a.conversation, from_b.conversation);
        assert_eq!(from_a.conversation, ConversationId::direct(&a, &b));
    }

    #[test]
    fn test_body_length_cap() {
        let (a, b) = pair();
        let long = "x".repeat(MAX_BODY_LEN + 1);
        let err = DirectMessage::send(a, b, MessageKind::Text, long).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MessageTooLong { len, max } if len == MAX_BODY_LEN + 1 && max == MAX_BODY_LEN
        ));

        let exact = "x".repeat(MAX_BODY_LEN);
        assert!(DirectMessage::send(a, b, MessageKind::Text, exact).is_ok());
    }

    #[test]
    fn test_delivery_only_moves_forward() {
        let (a, b) = pair();
        let mut msg = DirectMessage::send(a, b, MessageKind::Text, "ping").unwrap();
        assert_eq!(msg.state, DeliveryState::Sent);

        assert!(msg.mark_delivered());
        assert!(msg.mark_read());
        assert!(msg.is_read());

        // Receipts arriving late must not regress the state
        assert!(!msg.mark_delivered());
        assert!(!msg.advance(DeliveryState::Sent));
        assert_eq!(msg.state, DeliveryState::Read);
    }

    #[test]
    fn test_story_reply_kind_round_trip() {
        let story = StoryId::generate();
        let kind = MessageKind::StoryReply { story };
        let json = serde_json::to_string(&kind).unwrap();
        assert!(json.contains("story_reply"));

        let back: MessageKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }
}
