//! Subcommands plus the settings shared by `render` and `preview`.

pub mod list;
pub mod preview;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use ordermail_core::RenderConfig;
use ordermail_renderer::{EmailPayload, Renderer, TemplateEngine};

/// Where the render configuration comes from.
#[derive(Args, Debug)]
pub struct RenderSettings {
    /// YAML config file (base_url, brand_name, support_email, utc_offset_minutes).
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Client site root used for menu and tracking links. Overrides the config file.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Brand shown in headers and footers. Overrides the config file.
    #[arg(long, value_name = "NAME")]
    pub brand: Option<String>,

    /// Directory of `.html` templates that replace the embedded ones.
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

impl RenderSettings {
    /// Config file first, then CLI overrides. One of the two must supply a base URL.
    pub fn resolve_config(&self) -> Result<RenderConfig> {
        let mut config = match (&self.config, &self.base_url) {
            (Some(path), _) => RenderConfig::load_at(path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?,
            (None, Some(url)) => RenderConfig::new(url.as_str())
                .with_context(|| format!("invalid --base-url '{url}'"))?,
            (None, None) => anyhow::bail!("provide --config <FILE> or --base-url <URL>"),
        };
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(brand) = &self.brand {
            config.brand_name = brand.clone();
        }
        config.validated().context("invalid render configuration")
    }

    pub fn build_renderer(&self) -> Result<Renderer> {
        let config = self.resolve_config()?;
        let engine = TemplateEngine::new(self.templates.as_deref())
            .context("failed to load templates")?;
        Ok(Renderer::with_engine(engine, config))
    }
}

/// Read a JSON payload: `{ "user": {...}, "order": {...}, "status": "..." }`.
pub fn load_payload(path: &Path) -> Result<EmailPayload> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read payload '{}'", path.display()))?;
    let payload: EmailPayload = serde_json::from_str(&contents)
        .with_context(|| format!("invalid payload JSON in '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded payload");
    Ok(payload)
}
