//! `odk replay`: run a scripted session through a basket.
//!
//! Output is one `key=value` line per record, in order:
//!
//! ```text
//! commit step=1 code=RICE-10KG value=1 source=add corrected=false
//! row code=RICE-10KG quantity=1 view=stepper text=1
//! journal path=... session_id=... events=4 last_seq=3
//! config_hash=... lines=4 ordered=3 commits=4 total_cents=35543
//! ```

use anyhow::{Context, Result};
use odk_basket::{Basket, LineItem, Step};
use odk_config::{report_unused_keys, LoadedConfig, UnusedKeyPolicy};
use odk_journal::JournalWriter;
use odk_quantity::{FieldView, Outcome};
use std::io::Write;
use uuid::Uuid;

use super::load_document;

pub struct ReplayArgs {
    pub basket: String,
    pub script: String,
    pub journal: Option<String>,
    pub strict_config: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub lines: usize,
    pub ordered: usize,
    pub commits: usize,
    pub total_cents: i64,
}

pub fn run(args: &ReplayArgs, loaded: &LoadedConfig, out: &mut impl Write) -> Result<ReplaySummary> {
    let policy = if args.strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    report_unused_keys(&loaded.config_json, policy)?;
    let defaults = loaded.field_defaults()?;

    let lines: Vec<LineItem> = load_document(&args.basket, "basket")?;
    let steps: Vec<Step> = load_document(&args.script, "script")?;
    let mut basket = Basket::with_items(defaults.bounds, lines).context("invalid basket")?;

    tracing::info!(
        config_hash = %loaded.config_hash,
        lines = basket.len(),
        steps = steps.len(),
        "replay started"
    );

    let mut commits = 0;
    for (i, step) in steps.iter().enumerate() {
        let n = i + 1;
        let outcome = basket
            .apply_step(step)
            .with_context(|| format!("script step {n} ({}) failed", step.action.as_str()))?;
        if let Outcome::Committed(c) = outcome {
            commits += 1;
            writeln!(
                out,
                "commit step={n} code={} value={} source={} corrected={}",
                step.code.as_deref().unwrap_or("-"),
                c.value,
                c.source.as_str(),
                c.corrected
            )?;
        }
    }

    let changes = basket.take_changes();
    if let Some(path) = &args.journal {
        let mut writer = JournalWriter::open(path, Uuid::new_v4(), true)?;
        let events = writer.append_all(&changes)?;
        writeln!(
            out,
            "journal path={} session_id={} events={} last_seq={}",
            path,
            writer.session_id(),
            events.len(),
            writer.seq().saturating_sub(1)
        )?;
    }

    for row in basket.rows() {
        match &row.field {
            FieldView::AddTrigger { enabled } => writeln!(
                out,
                "row code={} quantity={} view=add enabled={}",
                row.code, row.quantity, enabled
            )?,
            FieldView::Stepper { text, editable, .. } => writeln!(
                out,
                "row code={} quantity={} view=stepper text={} enabled={}",
                row.code, row.quantity, text, editable
            )?,
        }
    }

    let summary = ReplaySummary {
        lines: basket.len(),
        ordered: basket.ordered_lines().count(),
        commits,
        total_cents: basket.total_cents(),
    };
    writeln!(
        out,
        "config_hash={} lines={} ordered={} commits={} total_cents={}",
        loaded.config_hash, summary.lines, summary.ordered, summary.commits, summary.total_cents
    )?;

    tracing::info!(commits, total_cents = summary.total_cents, "replay finished");
    Ok(summary)
}
