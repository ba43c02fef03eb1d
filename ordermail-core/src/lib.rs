//! ordermail core library — order/user types, formatting, status table, config.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`format`] — money and date formatting
//! - [`status`] — [`OrderStatus`] and its presentation table
//! - [`config`] — [`RenderConfig`]
//! - [`clock`] — [`Clock`], [`SystemClock`], [`FixedClock`]
//! - [`error`] — [`DataError`], [`ConfigError`]

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod status;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::RenderConfig;
pub use error::{ConfigError, DataError};
pub use status::{OrderStatus, StatusPresentation};
pub use types::{Order, OrderId, OrderItem, OrderNumber, PaymentType, User};
