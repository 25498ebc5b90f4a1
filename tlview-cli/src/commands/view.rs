//! `tlview view` command handler

use std::collections::BTreeSet;
use std::io::Write;

use serde::Serialize;
use tracing::{debug, warn};

use tlview_core::config::TlviewConfig;
use tlview_core::types::Selection;
use tlview_pipeline::{Action, Cell, TableModel, ViewState};

use crate::cli::ViewArgs;
use crate::commands::{CliSession, pipeline_config, populate};
use crate::error::CliError;
use crate::output::{OutputWriter, Render, single_line};

/// Maximum characters per cell in text output.
const MAX_CELL_CHARS: usize = 60;

/// Execute the `view` command.
pub async fn execute(
    args: ViewArgs,
    config: &TlviewConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let pipeline = pipeline_config(config, args.decode);
    let (mut session, origin) = populate(&pipeline, args.source.as_deref()).await?;

    apply_view_args(&mut session, &args);

    let table = TableModel::from_view(session.state(), args.limit);
    writer.render(&ViewReport {
        source: origin,
        event: session.state().event_selection().to_string(),
        frame: session.state().frame_selection().to_string(),
        summary: table.summary(),
        table,
    })?;
    Ok(())
}

/// Translate command-line selections into view actions.
pub fn apply_view_args(session: &mut CliSession, args: &ViewArgs) {
    let event: Selection = args.event.as_str().into();
    let frame: Selection = args.frame.as_str().into();

    warn_unknown(session.state(), &event, &frame);

    session.dispatch(Action::SelectEvent(event));
    session.dispatch(Action::SelectFrame(frame));
    session.dispatch(Action::ShowAllColumns(args.show_all));

    if args.only.is_empty() && args.hide.is_empty() {
        return;
    }

    let hidden = hidden_columns(session.state(), &args.only, &args.hide);
    session.dispatch(Action::SetAllColumnsVisible(true));
    for column in hidden {
        session.dispatch(Action::ToggleColumn(column));
    }
}

/// Columns to hide given `--only` and `--hide`. Repeated names are harmless.
fn hidden_columns(state: &ViewState, only: &[String], hide: &[String]) -> BTreeSet<String> {
    let columns = state.dynamic_columns();
    for name in only.iter().chain(hide) {
        if !columns.iter().any(|c| c == name) {
            warn!(column = %name, "ignoring unknown column");
        }
    }

    columns
        .iter()
        .filter(|c| (!only.is_empty() && !only.contains(*c)) || hide.contains(*c))
        .cloned()
        .collect()
}

fn warn_unknown(state: &ViewState, event: &Selection, frame: &Selection) {
    if !event.is_all() && !state.available_event_keys().iter().any(|k| k == event.as_str()) {
        warn!(event = %event, "event key not present in dataset");
    }
    if !frame.is_all() && !state.available_frames().iter().any(|f| f == frame.as_str()) {
        warn!(frame = %frame, "frame not present in dataset");
    }
    debug!(event = %event, frame = %frame, "applying selection");
}

/// Filtered table output.
#[derive(Serialize)]
pub struct ViewReport {
    pub source: String,
    pub event: String,
    pub frame: String,
    pub summary: String,
    pub table: TableModel,
}

impl Render for ViewReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Source: {}  event={} frame={}",
            self.source.bold(),
            self.event,
            self.frame
        )?;
        writeln!(w)?;

        let texts: Vec<Vec<String>> = self
            .table
            .rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let widths: Vec<usize> = self
            .table
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                texts
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        let header: Vec<String> = self
            .table
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, width)| pad(name, *width))
            .collect();
        writeln!(w, "{}", header.join("  ").trim_end().bold())?;
        let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        writeln!(w, "{}", "-".repeat(total_width))?;

        for row in &texts {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(text, width)| pad(text, *width))
                .collect();
            writeln!(w, "{}", line.join("  ").trim_end())?;
        }

        writeln!(w)?;
        if self.table.rows.len() < self.table.shown {
            writeln!(
                w,
                "{} (showing first {})",
                self.summary.green(),
                self.table.rows.len()
            )?;
        } else {
            writeln!(w, "{}", self.summary.green())?;
        }
        Ok(())
    }
}

fn cell_text(cell: &Cell) -> String {
    single_line(&cell.text, MAX_CELL_CHARS)
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DecodeArgs;
    use tlview_pipeline::{LatestState, PipelineConfig, Session, TextSource};

    const TRACE: &str = concat!(
        "{\"frame_id\":0,\"frame_compile_id\":0,\"describe_tensor\":{\"id\":0,\"describer_id\":7,\"dtype\":\"torch.float32\",\"size\":[3,4]}}\n",
        "{\"frame_id\":0,\"frame_compile_id\":0,\"describe_source\":{\"describer_id\":7,\"id\":0,\"source\":\"L['x']\"}}\n",
        "{\"frame_id\":1,\"frame_compile_id\":0,\"attempt\":1,\"compilation_metrics\":{\"graph_op_count\":3}}\n",
    );

    fn args(event: &str) -> ViewArgs {
        ViewArgs {
            source: None,
            event: event.to_owned(),
            frame: "all".to_owned(),
            show_all: false,
            hide: Vec::new(),
            only: Vec::new(),
            limit: None,
            decode: DecodeArgs { lenient: false },
        }
    }

    async fn loaded_session() -> CliSession {
        let mut session: CliSession =
            Session::new(&PipelineConfig::default(), None, LatestState::default());
        session
            .load(&TextSource::new("trace", TRACE))
            .await
            .expect("load trace");
        session
    }

    fn render(report: &ViewReport) -> String {
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[tokio::test]
    async fn test_apply_view_args_event_filter() {
        let mut session = loaded_session().await;
        apply_view_args(&mut session, &args("describe_source"));

        let state = session.state();
        assert_eq!(state.filtered_len(), 1);
        assert!(state.dynamic_columns().iter().any(|c| c == "dtype"));
    }

    #[tokio::test]
    async fn test_apply_view_args_hide_and_only() {
        let mut session = loaded_session().await;
        let mut hide = args("describe_source");
        hide.hide = vec!["dtype".to_owned(), "nonexistent".to_owned()];
        apply_view_args(&mut session, &hide);
        assert!(!session.state().is_column_visible("dtype"));
        assert!(session.state().is_column_visible("source"));

        let mut session = loaded_session().await;
        let mut only = args("describe_source");
        only.only = vec!["source".to_owned()];
        apply_view_args(&mut session, &only);
        assert_eq!(session.state().visible_columns(), vec!["source"]);
    }

    #[tokio::test]
    async fn test_apply_view_args_repeated_columns_are_idempotent() {
        let mut session = loaded_session().await;
        let mut only = args("describe_source");
        only.only = vec!["dtype".to_owned(), "dtype".to_owned()];
        apply_view_args(&mut session, &only);
        assert_eq!(session.state().visible_columns(), vec!["dtype"]);

        let mut session = loaded_session().await;
        let mut both = args("describe_source");
        both.only = vec!["dtype".to_owned(), "source".to_owned()];
        both.hide = vec!["dtype".to_owned(), "dtype".to_owned()];
        apply_view_args(&mut session, &both);
        assert!(!session.state().is_column_visible("dtype"));
        assert!(session.state().is_column_visible("source"));
    }

    #[tokio::test]
    async fn test_view_report_render_text() {
        let mut session = loaded_session().await;
        apply_view_args(&mut session, &args("all"));
        let table = TableModel::from_view(session.state(), Some(2));
        let report = ViewReport {
            source: "trace".to_owned(),
            event: "all".to_owned(),
            frame: "all".to_owned(),
            summary: table.summary(),
            table,
        };

        let output = render(&report);
        assert!(output.contains("event_key"), "header should list event_key");
        assert!(output.contains("describe_tensor"));
        assert!(output.contains("3 of 3 entries"));
        assert!(output.contains("showing first 2"));
        assert!(!output.contains("compilation_metrics"), "limited to 2 rows");
    }

    #[tokio::test]
    async fn test_view_report_json_contains_table() {
        let mut session = loaded_session().await;
        apply_view_args(&mut session, &args("compilation_metrics"));
        let table = TableModel::from_view(session.state(), None);
        let report = ViewReport {
            source: "trace".to_owned(),
            event: "compilation_metrics".to_owned(),
            frame: "all".to_owned(),
            summary: table.summary(),
            table,
        };

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["summary"], "1 of 3 entries");
        assert_eq!(json["table"]["rows"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_pad_unicode_width() {
        assert_eq!(pad("한글", 4), "한글  ");
        assert_eq!(pad("abcdef", 3), "abcdef");
    }
}
