//! Configuration for Tether services.
//!
//! Plain serde structs bound to a TOML file. Every field has a default, so
//! an empty file is a valid config; unknown keys are rejected rather than
//! silently ignored. The pairing namespaces and the cache-key prefix are
//! deliberately *not* configurable — identifiers and keys already written
//! under them would go stale.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::otp::OtpPolicy;

/// Top-level configuration for Tether
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TetherConfig {
    /// Verification-code policy
    #[serde(default)]
    pub otp: OtpPolicy,

    /// Story lifetime settings
    #[serde(default)]
    pub story: StoryConfig,
}

/// Story lifetime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoryConfig {
    /// How long a story stays visible after posting, in seconds
    #[serde(default = "default_story_ttl", with = "crate::utils::duration_secs")]
    pub default_ttl: std::time::Duration,
}

fn default_story_ttl() -> std::time::Duration {
    std::time::Duration::from_secs(24 * 60 * 60)
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_story_ttl(),
        }
    }
}

impl StoryConfig {
    /// The configured lifetime as a [`chrono::Duration`], ready for
    /// [`Story::post`](crate::story::Story::post)
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.default_ttl.as_secs() as i64)
    }
}

impl TetherConfig {
    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        save_config(self, path)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<TetherConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::ConfigIo {
        path: path.display().to_string(),
        cause: e,
    })?;

    let config = toml::from_str(&content).map_err(|e| CoreError::ConfigParse {
        path: path.display().to_string(),
        cause: e,
    })?;

    Ok(config)
}

/// Save configuration to a TOML file, creating parent directories as needed
pub fn save_config(config: &TetherConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CoreError::ConfigIo {
            path: parent.display().to_string(),
            cause: e,
        })?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| CoreError::ConfigEncode { cause: e })?;

    std::fs::write(path, content).map_err(|e| CoreError::ConfigIo {
        path: path.display().to_string(),
        cause: e,
    })
}
