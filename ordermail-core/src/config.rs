//! Render configuration.
//!
//! Replaces any process-environment lookup: the host passes a
//! [`RenderConfig`] explicitly, or loads one from YAML with
//! [`RenderConfig::load_at`].
//!
//! ```yaml
//! base_url: https://kitchen.example.com
//! brand_name: Annapurna Kitchen
//! support_email: help@kitchen.example.com
//! utc_offset_minutes: 330
//! ```

use std::path::Path;

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BRAND_NAME: &str = "Our Kitchen";

/// India Standard Time, UTC+05:30.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

fn default_brand_name() -> String {
    DEFAULT_BRAND_NAME.to_string()
}

fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}

/// Settings shared by every email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Client site root, e.g. `https://example.com`. Menu and tracking links
    /// are built from it.
    pub base_url: String,
    #[serde(default = "default_brand_name")]
    pub brand_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
    /// Offset applied to every displayed date.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl RenderConfig {
    /// Config with defaults for everything except `base_url`.
    ///
    /// Fails with `InvalidBaseUrl` unless the URL is http(s).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = RenderConfig {
            base_url: base_url.into(),
            brand_name: default_brand_name(),
            support_email: None,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        };
        config.validated()
    }

    /// Load from a YAML file.
    ///
    /// Returns `ConfigError::NotFound` if absent,
    /// `ConfigError::Parse` (with path + line context) if malformed YAML.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.to_path_buf() });
        }
        let contents = std::fs::read_to_string(path)?;
        let config: RenderConfig = serde_yaml::from_str(&contents).map_err(|e| {
            ConfigError::Parse { path: path.to_path_buf(), source: e }
        })?;
        tracing::debug!(path = %path.display(), "loaded render config");
        config.validated()
    }

    /// Normalise `base_url` (trailing `/` removed) and check the offset.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
        let has_host = trimmed
            .split_once("://")
            .map(|(_, rest)| !rest.is_empty())
            .unwrap_or(false);
        if !has_scheme || !has_host {
            return Err(ConfigError::InvalidBaseUrl(self.base_url));
        }
        self.base_url = trimmed;
        if offset_from_minutes(self.utc_offset_minutes).is_none() {
            return Err(ConfigError::InvalidUtcOffset(self.utc_offset_minutes));
        }
        if self.brand_name.trim().is_empty() {
            self.brand_name = default_brand_name();
        }
        Ok(self)
    }

    /// `{base_url}/menu`
    pub fn menu_url(&self) -> String {
        format!("{}/menu", self.base_url)
    }

    /// `{base_url}/track-order/{order_id}`
    pub fn tracking_url(&self, order_id: &str) -> String {
        format!("{}/track-order/{}", self.base_url, order_id)
    }

    /// Display offset; an out-of-range offset renders in UTC.
    pub fn offset(&self) -> FixedOffset {
        offset_from_minutes(self.utc_offset_minutes).unwrap_or_else(|| Utc.fix())
    }
}

fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}
