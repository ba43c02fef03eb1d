//! Tera rendering engine — [`EmailKind`] enum, [`TemplateEngine`] and [`Renderer`].
//!
//! # Templates
//!
//! | Kind               | Template                  | Needs               |
//! |--------------------|---------------------------|---------------------|
//! | Welcome            | `welcome.html`            | user                |
//! | AdminOrder         | `admin_order.html`        | order               |
//! | OrderConfirmation  | `order_confirmation.html` | user, order         |
//! | OrderReady         | `order_ready.html`        | user, order         |
//! | Invoice            | `invoice.html`            | user, order         |
//! | OrderStatus        | `order_status.html`       | user, order, status |
//!
//! All templates extend `layout.html`. Autoescaping is on for every `.html`
//! template, so any user-supplied text is escaped on output.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tera::Tera;

use ordermail_core::{Clock, DataError, Order, RenderConfig, SystemClock, User};

use crate::context::EmailContext;
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("layout.html", include_str!("templates/layout.html")),
    ("partials/items_list.html", include_str!("templates/partials/items_list.html")),
    ("partials/items_table.html", include_str!("templates/partials/items_table.html")),
    ("partials/tracking.html", include_str!("templates/partials/tracking.html")),
    ("welcome.html", include_str!("templates/welcome.html")),
    ("admin_order.html", include_str!("templates/admin_order.html")),
    ("order_confirmation.html", include_str!("templates/order_confirmation.html")),
    ("order_ready.html", include_str!("templates/order_ready.html")),
    ("invoice.html", include_str!("templates/invoice.html")),
    ("order_status.html", include_str!("templates/order_status.html")),
];

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// HTML escaping for interpolated values.
///
/// Escapes `& < > " '`. Unlike tera's default it leaves `/` alone so
/// links stay readable in the generated source.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Every `.html` file under `root`, keyed by its lowercased path relative to
/// `root`. Sorted so later duplicates (case-only differences) win predictably.
fn read_override_dir(root: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !root.exists() {
        tracing::debug!(dir = %root.display(), "override template dir absent");
        return Ok(vec![]);
    }
    let mut pending = vec![root.to_path_buf()];
    let mut found = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).map_err(|e| io_err(&dir, e))? {
            let path = entry.map_err(|e| io_err(&dir, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_html(&path) {
                found.push(path);
            }
        }
    }
    found.sort();

    found
        .into_iter()
        .map(|path| -> Result<(String, String), RenderError> {
            let name = normalize_template_name(path.strip_prefix(root).unwrap_or(path.as_path()));
            let body = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            tracing::debug!(template = %name, "loaded override template");
            Ok((name, body))
        })
        .collect()
}

fn build_tera(override_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = override_dir {
        for (name, content) in read_override_dir(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![".html"]);
    tera.set_escape_fn(escape_html);
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// EmailKind
// ---------------------------------------------------------------------------

/// Every email this crate can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmailKind {
    Welcome,
    AdminOrder,
    OrderConfirmation,
    OrderReady,
    Invoice,
    OrderStatus,
}

impl EmailKind {
    /// All kinds in a stable order.
    pub fn all() -> &'static [EmailKind] {
        &[
            EmailKind::Welcome,
            EmailKind::AdminOrder,
            EmailKind::OrderConfirmation,
            EmailKind::OrderReady,
            EmailKind::Invoice,
            EmailKind::OrderStatus,
        ]
    }

    /// Kebab-case identifier, also used for preview file names.
    pub fn slug(&self) -> &'static str {
        match self {
            EmailKind::Welcome           => "welcome",
            EmailKind::AdminOrder        => "admin-order",
            EmailKind::OrderConfirmation => "order-confirmation",
            EmailKind::OrderReady        => "order-ready",
            EmailKind::Invoice           => "invoice",
            EmailKind::OrderStatus       => "order-status",
        }
    }

    /// Template rendered for this kind.
    pub fn template_name(&self) -> &'static str {
        match self {
            EmailKind::Welcome           => "welcome.html",
            EmailKind::AdminOrder        => "admin_order.html",
            EmailKind::OrderConfirmation => "order_confirmation.html",
            EmailKind::OrderReady        => "order_ready.html",
            EmailKind::Invoice           => "invoice.html",
            EmailKind::OrderStatus       => "order_status.html",
        }
    }

    pub fn needs_user(&self) -> bool {
        !matches!(self, EmailKind::AdminOrder)
    }

    pub fn needs_order(&self) -> bool {
        !matches!(self, EmailKind::Welcome)
    }

    pub fn needs_status(&self) -> bool {
        matches!(self, EmailKind::OrderStatus)
    }

    /// Subject line. The status email appends the status label separately.
    pub fn subject(&self, brand_name: &str, order_number: &str) -> String {
        match self {
            EmailKind::Welcome           => format!("Welcome to {brand_name}!"),
            EmailKind::AdminOrder        => format!("New Order Received - #{order_number}"),
            EmailKind::OrderConfirmation => format!("Order Confirmed - #{order_number}"),
            EmailKind::OrderReady        => format!("Your Order is Ready! - #{order_number}"),
            EmailKind::Invoice           => format!("Invoice for Order #{order_number}"),
            EmailKind::OrderStatus       => format!("Order Update - #{order_number}"),
        }
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EmailKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        EmailKind::all()
            .iter()
            .copied()
            .find(|kind| kind.slug() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = EmailKind::all().iter().map(|k| k.slug()).collect();
                format!("unknown email kind '{s}'; expected: {}", known.join(", "))
            })
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering templates with optional overrides.
///
/// `override_dir` may contain `.html` files that replace embedded templates
/// of the same relative path. Template names are normalised to lowercase.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a new [`TemplateEngine`], loading embedded templates plus any
    /// overrides found in `override_dir`.
    pub fn new(override_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(override_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render the template for `kind` with the supplied context.
    pub fn render(&self, ctx: &EmailContext, kind: EmailKind) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let html = self.tera.render(kind.template_name(), &tera_ctx)?;
        tracing::debug!(kind = %kind, bytes = html.len(), "rendered email");
        Ok(html)
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Inputs for [`Renderer::render`]; only the parts the kind needs are read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailPayload {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub order: Option<Order>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A finished email body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedEmail {
    pub kind: EmailKind,
    pub subject: String,
    pub html: String,
}

/// Renders every email kind against one configuration.
///
/// Create once and reuse; rendering only reads shared state, so a
/// `Renderer` can be shared across threads.
pub struct Renderer {
    engine: TemplateEngine,
    config: RenderConfig,
    clock: Arc<dyn Clock>,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates and the system clock.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        Ok(Self::with_engine(TemplateEngine::new(None)?, config))
    }

    /// Use a caller-built engine (e.g. one with overrides).
    pub fn with_engine(engine: TemplateEngine, config: RenderConfig) -> Self {
        Renderer { engine, config, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock used for footer years and invoice dates.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render_welcome(&self, user: &User) -> Result<String, RenderError> {
        let ctx = EmailContext::welcome(user, &self.config, self.clock.now())?;
        self.engine.render(&ctx, EmailKind::Welcome)
    }

    pub fn render_admin_order_notification(&self, order: &Order) -> Result<String, RenderError> {
        let ctx = EmailContext::admin_order(order, &self.config, self.clock.now())?;
        self.engine.render(&ctx, EmailKind::AdminOrder)
    }

    pub fn render_order_confirmation(
        &self,
        user: &User,
        order: &Order,
    ) -> Result<String, RenderError> {
        let ctx = EmailContext::order_confirmation(user, order, &self.config, self.clock.now())?;
        self.engine.render(&ctx, EmailKind::OrderConfirmation)
    }

    pub fn render_order_ready(&self, user: &User, order: &Order) -> Result<String, RenderError> {
        let ctx = EmailContext::order_ready(user, order, &self.config, self.clock.now())?;
        self.engine.render(&ctx, EmailKind::OrderReady)
    }

    pub fn render_invoice(&self, user: &User, order: &Order) -> Result<String, RenderError> {
        let ctx = EmailContext::invoice(user, order, &self.config, self.clock.now())?;
        self.engine.render(&ctx, EmailKind::Invoice)
    }

    /// Unknown `status` keywords are not an error: the generic presentation
    /// is used and the keyword is still shown, uppercased.
    pub fn render_order_status(
        &self,
        user: &User,
        order: &Order,
        status: &str,
    ) -> Result<String, RenderError> {
        let ctx = EmailContext::order_status(user, order, status, &self.config, self.clock.now())?;
        self.engine.render(&ctx, EmailKind::OrderStatus)
    }

    /// Render `kind` from a payload, returning subject and body together.
    pub fn render(
        &self,
        kind: EmailKind,
        payload: &EmailPayload,
    ) -> Result<RenderedEmail, RenderError> {
        let ctx = self.context_for(kind, payload)?;
        let html = self.engine.render(&ctx, kind)?;
        Ok(RenderedEmail { kind, subject: ctx.subject, html })
    }

    fn context_for(
        &self,
        kind: EmailKind,
        payload: &EmailPayload,
    ) -> Result<EmailContext, RenderError> {
        let now = self.clock.now();
        let cfg = &self.config;
        let user = || payload.user.as_ref().ok_or_else(|| DataError::missing("user"));
        let order = || payload.order.as_ref().ok_or_else(|| DataError::missing("order"));
        let status = || payload.status.as_deref().ok_or_else(|| DataError::missing("status"));
        let ctx = match kind {
            EmailKind::Welcome => EmailContext::welcome(user()?, cfg, now)?,
            EmailKind::AdminOrder => EmailContext::admin_order(order()?, cfg, now)?,
            EmailKind::OrderConfirmation => {
                EmailContext::order_confirmation(user()?, order()?, cfg, now)?
            }
            EmailKind::OrderReady => EmailContext::order_ready(user()?, order()?, cfg, now)?,
            EmailKind::Invoice => EmailContext::invoice(user()?, order()?, cfg, now)?,
            EmailKind::OrderStatus => {
                EmailContext::order_status(user()?, order()?, status()?, cfg, now)?
            }
        };
        Ok(ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
