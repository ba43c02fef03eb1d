//! ordermail — render order email bodies from JSON payloads.
//!
//! # Usage
//!
//! ```text
//! ordermail list [--json]
//! ordermail render <kind> --payload <file.json> [--status <s>] [--out <file>]
//! ordermail preview --payload <file.json> --out-dir <dir> [--status <s>] [--dry-run]
//! ```
//!
//! `render` and `preview` also accept `--config <ordermail.yaml>`,
//! `--base-url <url>`, `--brand <name>` and `--templates <dir>`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{list::ListArgs, preview::PreviewArgs, render::RenderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ordermail",
    version,
    about = "Render HTML email bodies for food orders",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the email kinds and what each one needs.
    List(ListArgs),

    /// Render one email to stdout or a file.
    Render(RenderArgs),

    /// Render every email kind into a directory.
    Preview(PreviewArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::List(args) => args.run(),
        Commands::Render(args) => args.run(),
        Commands::Preview(args) => args.run(),
    }
}

/// Logs go to stderr so rendered HTML on stdout stays clean.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
