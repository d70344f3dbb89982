use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CoreError {
    #[error("Cannot connect a user to themselves")]
    #[diagnostic(
        code(tether_core::self_connection),
        help("A connection needs two distinct participants; got '{user}' on both sides")
    )]
    SelfConnection { user: String },

    #[error("Connection already exists")]
    #[diagnostic(
        code(tether_core::already_connected),
        help("The pair already resolves to connection '{id}'; respond to it instead of re-requesting")
    )]
    AlreadyConnected { id: String },

    #[error("Connection not found")]
    #[diagnostic(
        code(tether_core::connection_not_found),
        help("No connection exists between '{a}' and '{b}'")
    )]
    ConnectionNotFound { a: String, b: String },

    #[error("Invalid connection transition: {from} -> {to}")]
    #[diagnostic(
        code(tether_core::invalid_transition),
        help("Only pending connections can be accepted or declined; blocking is always allowed")
    )]
    InvalidTransition { from: String, to: String },

    #[error("Invalid username '{name}'")]
    #[diagnostic(
        code(tether_core::invalid_username),
        help("Usernames are 3-32 chars of [a-z0-9_.] and start with a letter or digit: {reason}")
    )]
    InvalidUsername { name: String, reason: String },

    #[error("Message body too long ({len} chars, max {max})")]
    #[diagnostic(
        code(tether_core::message_too_long),
        help("Split the message or drop attachments into media messages")
    )]
    MessageTooLong { len: usize, max: usize },

    #[error("Unknown reaction kind '{name}'")]
    #[diagnostic(
        code(tether_core::unknown_reaction_kind),
        help("Valid kinds: like, love, laugh, wow, sad, fire")
    )]
    UnknownReactionKind { name: String },

    #[error("Verification code expired")]
    #[diagnostic(
        code(tether_core::otp_expired),
        help("Request a fresh code; codes are valid for a limited window after issue")
    )]
    OtpExpired,

    #[error("Verification code mismatch")]
    #[diagnostic(
        code(tether_core::otp_mismatch),
        help("{remaining} attempt(s) remaining before the code is invalidated")
    )]
    OtpMismatch { remaining: u32 },

    #[error("Verification attempts exhausted")]
    #[diagnostic(
        code(tether_core::otp_exhausted),
        help("The code is no longer usable; request a fresh one")
    )]
    OtpAttemptsExhausted,

    #[error("Resend requested too soon")]
    #[diagnostic(
        code(tether_core::resend_throttled),
        help("Wait {retry_after_seconds} second(s) before requesting another code")
    )]
    ResendThrottled { retry_after_seconds: u64 },

    #[error("Failed to read config at {path}")]
    #[diagnostic(
        code(tether_core::config_io),
        help("Check that the file exists and is readable")
    )]
    ConfigIo {
        path: String,
        #[source]
        cause: std::io::Error,
    },

    #[error("Failed to parse config at {path}")]
    #[diagnostic(
        code(tether_core::config_parse),
        help("Check the TOML against the documented schema; unknown keys are rejected")
    )]
    ConfigParse {
        path: String,
        #[source]
        cause: toml::de::Error,
    },

    #[error("Failed to encode config")]
    #[diagnostic(code(tether_core::config_encode))]
    ConfigEncode {
        #[source]
        cause: toml::ser::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn self_connection(user: impl ToString) -> Self {
        Self::SelfConnection {
            user: user.to_string(),
        }
    }

    pub fn invalid_username(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUsername {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
