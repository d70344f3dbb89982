//! One-time verification codes.
//!
//! Only the issue/verify state machine lives here; delivering codes to an
//! inbox is someone else's job. Codes themselves never appear in logs.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};
use crate::id::{OtpId, UserId};

/// Why a code was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    EmailVerification,
    PasswordReset,
    Login,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmailVerification => "email_verification",
            Self::PasswordReset => "password_reset",
            Self::Login => "login",
        }
    }
}

impl fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tunables for code issue and verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtpPolicy {
    /// Number of digits in a generated code
    #[serde(default = "default_code_length")]
    pub code_length: u8,

    /// How long a code stays valid after issue
    #[serde(default = "default_ttl", with = "crate::utils::duration_secs")]
    pub ttl: std::time::Duration,

    /// Wrong guesses allowed before the code is invalidated
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum wait before the same user can request another code
    #[serde(default = "default_resend_cooldown", with = "crate::utils::duration_secs")]
    pub resend_cooldown: std::time::Duration,
}

fn default_code_length() -> u8 {
    6
}

fn default_ttl() -> std::time::Duration {
    std::time::Duration::from_secs(10 * 60)
}

fn default_max_attempts() -> u32 {
    5
}

fn default_resend_cooldown() -> std::time::Duration {
    std::time::Duration::from_secs(60)
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            ttl: default_ttl(),
            max_attempts: default_max_attempts(),
            resend_cooldown: default_resend_cooldown(),
        }
    }
}

/// What a verification attempt decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpOutcome {
    Verified,
    Expired,
    Mismatch { remaining: u32 },
    Exhausted,
}

impl OtpOutcome {
    /// Collapse into a `Result` for callers that only branch on success
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Verified => Ok(()),
            Self::Expired => Err(CoreError::OtpExpired),
            Self::Mismatch { remaining } => Err(CoreError::OtpMismatch { remaining }),
            Self::Exhausted => Err(CoreError::OtpAttemptsExhausted),
        }
    }
}

/// An issued code awaiting verification.
///
/// Policy values that the challenge needs later (attempt budget, resend
/// gate) are copied in at issue time, so a policy change never loosens
/// codes already in flight.
#[derive(Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub id: OtpId,
    pub user: UserId,
    pub purpose: OtpPurpose,
    code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Earliest instant a replacement code may be requested
    pub resend_available_at: DateTime<Utc>,
    max_attempts: u32,
    attempts: u32,
    consumed: bool,
}

impl OtpChallenge {
    /// Issue a fresh uniform-random numeric code under `policy`
    pub fn issue(user: UserId, purpose: OtpPurpose, policy: &OtpPolicy, now: DateTime<Utc>) -> Self {
        let mut rng = rand::rng();
        let code: String = (0..policy.code_length)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();

        tracing::debug!("Issued {} code for user {}", purpose, user);

        Self {
            id: OtpId::generate(),
            user,
            purpose,
            code,
            issued_at: now,
            expires_at: now + Duration::seconds(policy.ttl.as_secs() as i64),
            resend_available_at: now + Duration::seconds(policy.resend_cooldown.as_secs() as i64),
            max_attempts: policy.max_attempts,
            attempts: 0,
            consumed: false,
        }
    }

    /// Check a submitted code against this challenge.
    ///
    /// Expiry is decided before the code is even compared, so an expired
    /// challenge never reveals whether a guess was right. A correct guess
    /// consumes the challenge; wrong guesses burn attempts until none
    /// remain.
    pub fn verify(&mut self, code: &str, now: DateTime<Utc>) -> OtpOutcome {
        if self.consumed || self.attempts >= self.max_attempts {
            return OtpOutcome::Exhausted;
        }
        if now >= self.expires_at {
            return OtpOutcome::Expired;
        }
        if self.code == code {
            self.consumed = true;
            return OtpOutcome::Verified;
        }

        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            tracing::warn!(
                "Verification attempts exhausted for user {} ({})",
                self.user,
                self.purpose
            );
            return OtpOutcome::Exhausted;
        }
        OtpOutcome::Mismatch {
            remaining: self.max_attempts - self.attempts,
        }
    }

    /// Whether the resend cooldown has elapsed at the supplied instant
    pub fn can_resend(&self, now: DateTime<Utc>) -> bool {
        now >= self.resend_available_at
    }

    /// Throttle check for a resend request at the supplied instant
    pub fn check_resend(&self, now: DateTime<Utc>) -> Result<()> {
        if self.can_resend(now) {
            Ok(())
        } else {
            let wait = (self.resend_available_at - now).num_seconds().max(1) as u64;
            Err(CoreError::ResendThrottled {
                retry_after_seconds: wait,
            })
        }
    }
}

// Manual Debug so the code can't leak through tracing or panic output
impl fmt::Debug for OtpChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpChallenge")
            .field("id", &self.id)
            .field("user", &self.user)
            .field("purpose", &self.purpose)
            .field("code", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("attempts", &self.attempts)
            .field("consumed", &self.consumed)
            .finish()
    }
}
