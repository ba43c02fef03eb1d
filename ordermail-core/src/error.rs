//! Error types for ordermail-core.

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

/// Problems with the user/order data handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// A price, quantity or amount is negative, zero where it must be
    /// positive, or otherwise not a usable number.
    #[error("invalid amount for `{field}`: {value}")]
    InvalidAmount { field: String, value: String },

    /// A field the email cannot be built without is absent or blank.
    #[error("missing required field `{field}`")]
    MissingRequiredField { field: String },

    /// Status keyword with no presentation entry. Callers treat this as
    /// non-fatal and fall back to the generic status entry.
    #[error("unknown order status '{status}'")]
    UnknownStatus { status: String },
}

impl DataError {
    pub fn invalid_amount(field: impl Into<String>, value: Decimal) -> Self {
        DataError::InvalidAmount { field: field.into(), value: value.to_string() }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        DataError::MissingRequiredField { field: field.into() }
    }
}

/// All errors that can arise while loading a [`crate::RenderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file did not exist at the given path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `base_url` is empty or not an http(s) URL.
    #[error("invalid base_url '{0}'; expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    /// `utc_offset_minutes` outside ±24h.
    #[error("invalid utc_offset_minutes {0}")]
    InvalidUtcOffset(i32),
}
