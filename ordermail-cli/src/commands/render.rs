//! `ordermail render <kind>` — render one email.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ordermail_renderer::EmailKind;

use super::{load_payload, RenderSettings};

/// Arguments for `ordermail render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Email kind: welcome | admin-order | order-confirmation | order-ready | invoice | order-status.
    pub kind: EmailKind,

    /// JSON payload with `user`, `order` and/or `status`.
    #[arg(long, short = 'p', value_name = "FILE")]
    pub payload: PathBuf,

    /// Status keyword for `order-status`. Overrides the payload's `status`.
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Write the HTML here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub settings: RenderSettings,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let renderer = self.settings.build_renderer()?;
        let mut payload = load_payload(&self.payload)?;
        if self.status.is_some() {
            payload.status = self.status.clone();
        }

        let email = renderer
            .render(self.kind, &payload)
            .with_context(|| format!("failed to render '{}'", self.kind))?;

        match &self.out {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("cannot create '{}'", parent.display()))?;
                }
                std::fs::write(path, &email.html)
                    .with_context(|| format!("cannot write '{}'", path.display()))?;
                println!(
                    "{} {} \"{}\" → {}",
                    "✓".green().bold(),
                    email.kind,
                    email.subject,
                    path.display()
                );
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(email.html.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }
}
