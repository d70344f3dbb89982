//! API request types
//!
//! The decode half of the wire mapping: explicit structs with explicit
//! `validate()` checks, no reflection-driven binding. Validation here
//! covers shape-level rules only; domain rules (duplicate connections,
//! delivery ordering) belong to `tether-core`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tether_core::{
    id::UserId,
    message::{MAX_BODY_LEN, MessageKind},
    otp::OtpPurpose,
    reaction::{ReactionKind, ReactionTarget},
    story::{StoryAudience, StoryMedia},
};

use crate::error::ApiError;

/// Connection request from one user to another
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateConnectionRequest {
    pub from: UserId,
    pub to: UserId,
}

impl CreateConnectionRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.from == self.to {
            return Err(ApiError::validation_field(
                "Cannot connect a user to themselves",
                "to",
                "must differ from 'from'",
            ));
        }
        Ok(())
    }
}

/// How a recipient answers a pending connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionAction {
    Accept,
    Decline,
    Block,
}

/// Response to a pending connection request
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RespondConnectionRequest {
    /// The user answering
    pub from: UserId,
    /// The user who sent the original request
    pub to: UserId,
    pub action: ConnectionAction,
}

impl RespondConnectionRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.from == self.to {
            return Err(ApiError::validation_field(
                "Cannot respond to a connection with yourself",
                "to",
                "must differ from 'from'",
            ));
        }
        Ok(())
    }
}

/// Direct message submission
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SendDirectMessageRequest {
    pub from: UserId,
    pub to: UserId,
    pub kind: MessageKind,
    pub body: String,
}

impl SendDirectMessageRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.from == self.to {
            return Err(ApiError::validation_field(
                "Cannot message yourself",
                "to",
                "must differ from 'from'",
            ));
        }
        if self.body.is_empty() {
            return Err(ApiError::validation_field(
                "Message body is empty",
                "body",
                "must not be empty",
            ));
        }
        let len = self.body.chars().count();
        if len > MAX_BODY_LEN {
            return Err(ApiError::validation_field(
                "Message body too long",
                "body",
                format!("{len} characters, at most {MAX_BODY_LEN} allowed"),
            ));
        }
        Ok(())
    }
}

/// Story submission
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PostStoryRequest {
    pub author: UserId,
    pub media: StoryMedia,
    #[serde(default)]
    pub audience: StoryAudience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl PostStoryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let url = match &self.media {
            StoryMedia::Image { url } => url,
            StoryMedia::Video { url } => url,
        };
        if url.is_empty() {
            return Err(ApiError::validation_field(
                "Story media has no URL",
                "media.url",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Reaction submission
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddReactionRequest {
    pub by: UserId,
    pub target: ReactionTarget,
    pub kind: ReactionKind,
}

impl AddReactionRequest {
    // Shape-level rules are fully enforced by the types
    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Ask for a fresh verification code
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RequestOtpRequest {
    pub user: UserId,
    pub purpose: OtpPurpose,
}

impl RequestOtpRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Submit a verification code
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VerifyOtpRequest {
    pub user: UserId,
    pub purpose: OtpPurpose,
    pub code: String,
}

impl VerifyOtpRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.code.is_empty() || self.code.len() > 10 {
            return Err(ApiError::validation_field(
                "Verification code has the wrong shape",
                "code",
                "expected 1-10 digits",
            ));
        }
        if !self.code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::validation_field(
                "Verification code has the wrong shape",
                "code",
                "digits only",
            ));
        }
        Ok(())
    }
}
