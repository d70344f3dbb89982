use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::id::{StoryId, UserId};

/// Who gets to see a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoryAudience {
    /// Anyone on the platform
    Everyone,
    /// Accepted connections only
    #[default]
    Connections,
    /// The author's hand-picked closest circle
    Closest,
}

/// What a story shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoryMedia {
    Image { url: String },
    Video { url: String },
}

/// An ephemeral post that disappears after its TTL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Unique identifier for this story
    pub id: StoryId,

    pub author: UserId,

    pub media: StoryMedia,

    pub audience: StoryAudience,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    pub posted_at: DateTime<Utc>,

    /// Past this instant the story is no longer served
    pub expires_at: DateTime<Utc>,
}

impl Story {
    /// Post a story that lives for `ttl` from now
    pub fn post(author: UserId, media: StoryMedia, audience: StoryAudience, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: StoryId::generate(),
            author,
            media,
            audience,
            caption: None,
            posted_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Whether the story is past its expiry at the supplied instant.
    ///
    /// Takes the clock value as an argument so expiry checks stay
    /// deterministic under test.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time left before expiry at the supplied instant, `None` once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.is_expired(now) {
            None
        } else {
            Some(self.expires_at - now)
        }
    }
}
