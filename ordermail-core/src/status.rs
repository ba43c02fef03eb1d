//! Order status keywords and how each one is presented in a status email.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Order lifecycle states with a dedicated presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub fn all() -> &'static [OrderStatus] {
        &[
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn presentation(&self) -> StatusPresentation {
        let (emoji, message, color) = match self {
            OrderStatus::Pending => (
                "⏳",
                "Your order has been received and is awaiting confirmation",
                "#f59e0b",
            ),
            OrderStatus::Confirmed => ("✅", "Your order has been confirmed", "#10b981"),
            OrderStatus::Preparing => ("👨‍🍳", "Your order is being prepared", "#3b82f6"),
            OrderStatus::Ready => ("🎉", "Your order is ready for pickup", "#8b5cf6"),
            OrderStatus::Completed => (
                "🙏",
                "Your order has been completed. Thank you!",
                "#059669",
            ),
            OrderStatus::Cancelled => ("❌", "Your order has been cancelled", "#ef4444"),
        };
        StatusPresentation { emoji, message, color }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DataError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        OrderStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| DataError::UnknownStatus { status: s.to_string() })
    }
}

/// Emoji, message and accent color for a status email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPresentation {
    pub emoji: &'static str,
    pub message: &'static str,
    pub color: &'static str,
}

impl StatusPresentation {
    /// Used for any status keyword without its own entry.
    pub const FALLBACK: StatusPresentation = StatusPresentation {
        emoji: "📋",
        message: "Order status updated",
        color: "#666",
    };

    /// Presentation for a raw status keyword, or the fallback entry.
    pub fn lookup(status: &str) -> Result<StatusPresentation, DataError> {
        status.parse::<OrderStatus>().map(|s| s.presentation())
    }

    /// Like [`StatusPresentation::lookup`], but unknown keywords are logged and
    /// mapped to [`StatusPresentation::FALLBACK`].
    pub fn lookup_or_fallback(status: &str) -> StatusPresentation {
        match Self::lookup(status) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(error = %err, "using fallback status presentation");
                Self::FALLBACK
            }
        }
    }
}
