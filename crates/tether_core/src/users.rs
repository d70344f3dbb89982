use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, Result};
use crate::id::UserId;

/// Coarse availability shown next to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Online,
    Away,
    #[default]
    Offline,
}

/// User profile record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for this user
    pub id: UserId,

    /// Unique handle, validated by [`validate_username`]
    pub username: String,

    /// Free-form name shown in place of the handle when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Verified contact address, if the user completed OTP verification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub presence: Presence,

    /// When this user was created
    pub created_at: DateTime<Utc>,

    /// When this user was last updated
    pub updated_at: DateTime<Utc>,

    /// User-specific settings (e.g., notification preferences)
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,

    /// Additional metadata about the user (e.g., source, tags)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl User {
    /// Create a user with a fresh id and a validated handle
    pub fn new(username: impl Into<String>) -> Result<Self> {
        let username = username.into();
        validate_username(&username)?;

        let now = Utc::now();
        Ok(Self {
            id: UserId::generate(),
            username,
            display_name: None,
            email: None,
            presence: Presence::default(),
            created_at: now,
            updated_at: now,
            settings: HashMap::new(),
            metadata: HashMap::new(),
        })
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name to show in UIs: display name when set, handle otherwise
    pub fn visible_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// Check a handle against the username rules: 3–32 characters drawn from
/// `[a-z0-9_.]`, starting with a letter or digit.
pub fn validate_username(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len < 3 {
        return Err(CoreError::invalid_username(name, "shorter than 3 characters"));
    }
    if len > 32 {
        return Err(CoreError::invalid_username(name, "longer than 32 characters"));
    }

    let mut chars = name.chars();
    let first = chars.next().unwrap_or_default();
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return Err(CoreError::invalid_username(
            name,
            "must start with a lowercase letter or digit",
        ));
    }

    for c in name.chars() {
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '_' && c != '.' {
            return Err(CoreError::invalid_username(
                name,
                format!("contains disallowed character '{c}'"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        for name in ["abc", "wren", "wren_42", "a.b.c", "0day", &"x".repeat(32)] {
            assert!(validate_username(name).is_ok(), "rejected '{name}'");
        }
    }

    #[test]
    fn test_invalid_usernames() {
        for name in [
            "",
            "ab",
            &"x".repeat(33),
            "_wren",
            ".wren",
            "Wren",
            "wren!",
            "wren gray",
        ] {
            assert!(validate_username(name).is_err(), "accepted '{name}'");
        }
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("wren").unwrap();
        assert_eq!(user.presence, Presence::Offline);
        assert_eq!(user.visible_name(), "wren");
        assert_eq!(user.created_at, user.updated_at);

        let named = user.with_display_name("Wren Gray");
        assert_eq!(named.visible_name(), "Wren Gray");
    }

    #[test]
    fn test_new_user_rejects_bad_handle() {
        assert!(matches!(
            User::new("No Spaces Allowed"),
            Err(CoreError::InvalidUsername { .. })
        ));
    }
}
