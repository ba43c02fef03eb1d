//! `ordermail preview` — render every email kind into a directory.
//!
//! Each kind is written to `<out-dir>/<kind>.html` via a `.tmp` file and a
//! rename. Files whose content would not change are left untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use ordermail_renderer::EmailKind;

use super::{load_payload, RenderSettings};

/// Arguments for `ordermail preview`.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// JSON payload with `user`, `order` and `status`.
    #[arg(long, short = 'p', value_name = "FILE")]
    pub payload: PathBuf,

    /// Directory that receives one `.html` file per kind.
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Status keyword for `order-status`. Overrides the payload's `status`.
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Show what would be written without actually writing any files.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub settings: RenderSettings,
}

/// Outcome of writing one preview file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    Written { path: PathBuf },
    WouldWrite { path: PathBuf },
    Unchanged { path: PathBuf },
    /// The payload lacks something this kind needs.
    Skipped { kind: EmailKind, reason: String },
}

impl PreviewArgs {
    pub fn run(self) -> Result<()> {
        let renderer = self.settings.build_renderer()?;
        let mut payload = load_payload(&self.payload)?;
        if self.status.is_some() {
            payload.status = self.status.clone();
        }

        let mut results = Vec::with_capacity(EmailKind::all().len());
        for kind in EmailKind::all() {
            let email = match renderer.render(*kind, &payload) {
                Ok(email) => email,
                Err(err) => {
                    tracing::warn!(kind = %kind, error = %err, "skipping preview");
                    results.push(WriteResult::Skipped { kind: *kind, reason: err.to_string() });
                    continue;
                }
            };
            let path = self.out_dir.join(format!("{}.html", kind.slug()));
            results.push(write_preview(&path, &email.html, self.dry_run)?);
        }

        print_results(&results, self.dry_run);
        if results.iter().all(|r| matches!(r, WriteResult::Skipped { .. })) {
            anyhow::bail!("no email could be rendered from '{}'", self.payload.display());
        }
        Ok(())
    }
}

fn write_preview(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult> {
    let content = content.replace("\r\n", "\n");

    if let Ok(existing) = std::fs::read_to_string(path) {
        if existing == content {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged { path: path.to_path_buf() });
        }
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite { path: path.to_path_buf() });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create '{}'", parent.display()))?;
    }
    let tmp = path.with_extension("html.tmp");
    std::fs::write(&tmp, &content).with_context(|| format!("cannot write '{}'", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e).with_context(|| format!("cannot replace '{}'", path.display()));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written { path: path.to_path_buf() })
}

fn print_results(results: &[WriteResult], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let changed = results
        .iter()
        .filter(|r| matches!(r, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
        .count();
    let unchanged = results
        .iter()
        .filter(|r| matches!(r, WriteResult::Unchanged { .. }))
        .count();
    let skipped = results.len() - changed - unchanged;

    println!(
        "{prefix}{} previews ({changed} written, {unchanged} unchanged, {skipped} skipped)",
        "✓".green().bold()
    );
    for r in results {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
            WriteResult::Skipped { kind, reason } => {
                println!("  {}  {kind}: {reason}", "✗".yellow())
            }
        }
    }
}
