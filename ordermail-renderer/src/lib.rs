//! # ordermail-renderer
//!
//! Tera-based engine that renders the HTML bodies of order emails (welcome,
//! admin notification, confirmation, ready, invoice, status update).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ordermail_core::{RenderConfig, User};
//! use ordermail_renderer::Renderer;
//!
//! fn welcome(user: &User) {
//!     let Ok(config) = RenderConfig::new("https://example.com") else { return };
//!     if let Ok(renderer) = Renderer::new(config) {
//!         if let Ok(html) = renderer.render_welcome(user) {
//!             println!("{} bytes", html.len());
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::EmailContext;
pub use engine::{EmailKind, EmailPayload, RenderedEmail, Renderer, TemplateEngine};
pub use error::RenderError;
