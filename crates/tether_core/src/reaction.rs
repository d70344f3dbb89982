use chrono::{DateTime, Utc};
use compact_str::CompactString;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::cache;
use crate::error::CoreError;
use crate::id::{MessageId, ReactionId, StoryId, UserId};

/// The fixed palette of reactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Love,
    Laugh,
    Wow,
    Sad,
    Fire,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Love => "love",
            Self::Laugh => "laugh",
            Self::Wow => "wow",
            Self::Sad => "sad",
            Self::Fire => "fire",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "love" => Ok(Self::Love),
            "laugh" => Ok(Self::Laugh),
            "wow" => Ok(Self::Wow),
            "sad" => Ok(Self::Sad),
            "fire" => Ok(Self::Fire),
            _ => Err(CoreError::UnknownReactionKind {
                name: s.to_string(),
            }),
        }
    }
}

/// What a reaction is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ReactionTarget {
    Message(MessageId),
    Story(StoryId),
}

impl ReactionTarget {
    /// Short name used in cache keys
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Story(_) => "story",
        }
    }

    pub fn uuid(&self) -> Uuid {
        match self {
            Self::Message(id) => id.uuid(),
            Self::Story(id) => id.uuid(),
        }
    }
}

/// One user's reaction to one message or story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Unique identifier for this reaction
    pub id: ReactionId,

    pub by: UserId,

    pub target: ReactionTarget,

    pub kind: ReactionKind,

    pub reacted_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(by: UserId, target: ReactionTarget, kind: ReactionKind) -> Self {
        Self {
            id: ReactionId::generate(),
            by,
            target,
            kind,
            reacted_at: Utc::now(),
        }
    }

    /// Uniqueness key over `(by, target)`.
    ///
    /// Two reactions from the same user to the same target share this key
    /// regardless of kind, which is how "one reaction per user per target"
    /// gets enforced by whatever store holds them.
    pub fn dedup_key(&self) -> CompactString {
        cache::reaction(&self.by, &self.target)
    }
}
