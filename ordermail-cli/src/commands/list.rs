//! `ordermail list` — show the email kinds.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ordermail_renderer::EmailKind;

/// Arguments for `ordermail list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled, Serialize)]
struct KindRow {
    #[tabled(rename = "kind")]
    kind: &'static str,
    #[tabled(rename = "template")]
    template: &'static str,
    #[tabled(rename = "needs")]
    needs: String,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let rows: Vec<KindRow> = EmailKind::all()
            .iter()
            .map(|kind| KindRow {
                kind: kind.slug(),
                template: kind.template_name(),
                needs: needs(*kind),
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

fn needs(kind: EmailKind) -> String {
    let mut parts = Vec::new();
    if kind.needs_user() {
        parts.push("user");
    }
    if kind.needs_order() {
        parts.push("order");
    }
    if kind.needs_status() {
        parts.push("status");
    }
    parts.join(", ")
}
