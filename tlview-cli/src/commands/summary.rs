//! `tlview summary` command handler

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use tlview_core::config::TlviewConfig;
use tlview_core::types::Selection;
use tlview_pipeline::Dataset;
use tlview_pipeline::classify::dynamic_columns;

use crate::cli::SummaryArgs;
use crate::commands::{pipeline_config, populate};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `summary` command.
pub async fn execute(
    args: SummaryArgs,
    config: &TlviewConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let pipeline = pipeline_config(config, args.decode);
    let (session, origin) = populate(&pipeline, args.source.as_deref()).await?;

    let report = SummaryReport::from_dataset(origin, session.state().dataset());
    writer.render(&report)?;
    Ok(())
}

/// Counts per event key and frame, plus processing statistics.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub source: String,
    pub records: usize,
    pub string_table_entries: usize,
    pub skipped_lines: usize,
    pub event_keys: BTreeMap<String, usize>,
    pub frames: BTreeMap<String, usize>,
    pub columns: Vec<String>,
    pub interned_resolved: usize,
    pub references_joined: usize,
    pub references_unmatched: usize,
    pub ambiguous_event_keys: usize,
}

impl SummaryReport {
    pub fn from_dataset(source: String, dataset: &Dataset) -> Self {
        let mut event_keys = BTreeMap::new();
        let mut frames = BTreeMap::new();
        for record in dataset.records() {
            // 이벤트 키가 없는 레코드는 집계에서 제외
            if let Some(key) = record.event_key() {
                *event_keys.entry(key.to_owned()).or_insert(0) += 1;
            }
            *frames.entry(record.frame().to_owned()).or_insert(0) += 1;
        }

        let stats = dataset.stats();
        Self {
            source,
            records: dataset.len(),
            string_table_entries: dataset.string_table().len(),
            skipped_lines: dataset.failures().len(),
            event_keys,
            frames,
            columns: dynamic_columns(dataset.records(), &Selection::All),
            interned_resolved: stats.interned_resolved,
            references_joined: stats.references_joined,
            references_unmatched: stats.references_unmatched,
            ambiguous_event_keys: stats.ambiguous_event_keys,
        }
    }
}

impl Render for SummaryReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Dataset: {}", self.source.bold())?;
        writeln!(w, "  Records:       {}", self.records)?;
        writeln!(w, "  String table:  {} entries", self.string_table_entries)?;
        if self.skipped_lines > 0 {
            writeln!(
                w,
                "  Skipped lines: {}",
                self.skipped_lines.to_string().yellow()
            )?;
        }
        writeln!(
            w,
            "  Joins:         {} joined, {} unmatched",
            self.references_joined, self.references_unmatched
        )?;
        writeln!(w, "  Interned refs: {}", self.interned_resolved)?;
        if self.ambiguous_event_keys > 0 {
            writeln!(
                w,
                "  Ambiguous:     {} record(s) with several event fields",
                self.ambiguous_event_keys.to_string().yellow()
            )?;
        }

        writeln!(w)?;
        writeln!(w, "{}", "Event keys".bold())?;
        render_counts(w, &self.event_keys)?;

        writeln!(w)?;
        writeln!(w, "{}", "Frames".bold())?;
        render_counts(w, &self.frames)?;

        writeln!(w)?;
        writeln!(w, "{} ({})", "Columns".bold(), self.columns.len())?;
        if !self.columns.is_empty() {
            writeln!(w, "  {}", self.columns.join(", "))?;
        }
        Ok(())
    }
}

fn render_counts(w: &mut dyn Write, counts: &BTreeMap<String, usize>) -> std::io::Result<()> {
    let width = counts.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (name, count) in counts {
        let label = if name.is_empty() { "(none)" } else { name.as_str() };
        writeln!(w, "  {:<width$}  {:>6}", label, count, width = width.max(6))?;
    }
    Ok(())
}
