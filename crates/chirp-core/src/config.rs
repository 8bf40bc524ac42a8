use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Default content limit, in characters.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 280;

/// Behaviour switches for a [`Timeline`](crate::Timeline).
///
/// Each switch is independent. The default enables all of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Only the owner may edit or delete a tweet, or delete a comment.
    pub ownership_checks: bool,
    /// Remember who liked each tweet and refuse duplicate likes. When off,
    /// likes are a bare counter and the same caller may like repeatedly.
    pub like_tracking: bool,
    /// Reject tweet and comment content longer than `max_content_chars`.
    pub content_validation: bool,
    /// Content limit in Unicode scalar values.
    pub max_content_chars: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            ownership_checks: true,
            like_tracking: true,
            content_validation: true,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl TimelineConfig {
    /// No ownership checks, no like tracking, no validation.
    pub fn permissive() -> Self {
        Self {
            ownership_checks: false,
            like_tracking: false,
            content_validation: false,
            ..Default::default()
        }
    }
}

/// Host configuration, usually read from `chirp.toml`.
///
/// ```toml
/// store_path = "chirp.snap"
///
/// [timeline]
/// ownership_checks = true
/// like_tracking = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChirpConfig {
    /// Snapshot file of the tweet store.
    pub store_path: PathBuf,
    pub timeline: TimelineConfig,
}

impl Default for ChirpConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("chirp.snap"),
            timeline: TimelineConfig::default(),
        }
    }
}

impl ChirpConfig {
    pub fn from_toml_str(s: &str) -> ServiceResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> ServiceResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }

    fn validate(&self) -> ServiceResult<()> {
        if self.timeline.content_validation && self.timeline.max_content_chars == 0 {
            return Err(ServiceError::Config(
                "max_content_chars must be positive when content_validation is on".into(),
            ));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ServiceError::Config("store_path must not be empty".into()));
        }
        Ok(())
    }
}
