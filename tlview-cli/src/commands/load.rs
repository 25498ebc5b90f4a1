//! `tlview load` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use tlview_core::config::TlviewConfig;
use tlview_pipeline::{AnySource, LoadReport as SessionReport};

use crate::cli::LoadArgs;
use crate::commands::{open_session, pipeline_config};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `load` command.
///
/// Reads the source, processes it, and persists the raw text to the store
/// so that later `view`/`summary` invocations can restore it.
pub async fn execute(
    args: LoadArgs,
    config: &TlviewConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let pipeline = pipeline_config(config, args.decode);
    let source = AnySource::from_arg(&args.source, &pipeline)?;

    let mut session = open_session(&pipeline);
    let report = session.load(&source).await?;
    info!(source = %report.source, records = report.records, "load command finished");

    let state = session.state();
    let report = LoadReport::new(
        report,
        state.available_event_keys().len(),
        state.available_frames().len(),
        session.store().map(|s| s.path().display().to_string()),
    );

    writer.render(&report)?;
    Ok(())
}

/// Result of a load.
#[derive(Serialize)]
pub struct LoadReport {
    pub source: String,
    pub records: usize,
    pub skipped_lines: usize,
    pub event_keys: usize,
    pub frames: usize,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<String>,
}

impl LoadReport {
    fn new(
        report: SessionReport,
        event_keys: usize,
        frames: usize,
        store_path: Option<String>,
    ) -> Self {
        Self {
            source: report.source,
            records: report.records,
            skipped_lines: report.skipped_lines,
            event_keys,
            frames,
            persisted: report.persisted,
            store_path,
        }
    }
}

impl Render for LoadReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Loaded: {}", self.source.bold())?;
        writeln!(w, "  Records:    {}", self.records)?;
        writeln!(w, "  Event keys: {}", self.event_keys)?;
        writeln!(w, "  Frames:     {}", self.frames)?;
        if self.skipped_lines > 0 {
            writeln!(
                w,
                "  Skipped:    {}",
                format!("{} malformed line(s)", self.skipped_lines).yellow()
            )?;
        }
        match (&self.store_path, self.persisted) {
            (Some(path), true) => writeln!(w, "  Persisted:  {} ({})", "yes".green(), path)?,
            (Some(_), false) => writeln!(w, "  Persisted:  {}", "failed".red())?,
            (None, _) => writeln!(w, "  Persisted:  no (store disabled)")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(skipped: usize, persisted: bool, store: Option<&str>) -> LoadReport {
        LoadReport {
            source: "trace.jsonl".to_owned(),
            records: 12,
            skipped_lines: skipped,
            event_keys: 4,
            frames: 2,
            persisted,
            store_path: store.map(str::to_owned),
        }
    }

    fn render(report: &LoadReport) -> String {
        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_load_report_render_text_persisted() {
        let output = render(&report(0, true, Some(".tlview/tlparse-jsonl-data")));
        assert!(output.contains("trace.jsonl"));
        assert!(output.contains("Records:    12"));
        assert!(output.contains("tlparse-jsonl-data"));
        assert!(!output.contains("Skipped"), "no skipped line when clean");
    }

    #[test]
    fn test_load_report_render_text_skipped_and_store_disabled() {
        let output = render(&report(3, false, None));
        assert!(output.contains("3 malformed line(s)"));
        assert!(output.contains("store disabled"));
    }

    #[test]
    fn test_load_report_render_text_persist_failed() {
        let output = render(&report(0, false, Some("/ro/blob")));
        assert!(output.contains("failed"));
    }

    #[test]
    fn test_load_report_json_serialization() {
        let json = serde_json::to_string(&report(1, true, None)).expect("serialize");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed["records"].as_u64(), Some(12));
        assert_eq!(parsed["skipped_lines"].as_u64(), Some(1));
        assert!(parsed.get("store_path").is_none());
    }

    #[tokio::test]
    async fn test_execute_load_persists_to_data_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let trace = dir.path().join("trace.jsonl");
        std::fs::write(
            &trace,
            "{\"frame_id\":0,\"frame_compile_id\":0,\"dynamo_start\":{\"stack\":[]}}\n",
        )
        .expect("write trace");

        let mut config = TlviewConfig::default();
        config.general.data_dir = dir.path().join("data").display().to_string();

        let args = LoadArgs {
            source: trace.display().to_string(),
            decode: crate::cli::DecodeArgs { lenient: false },
        };
        let writer = OutputWriter::new(crate::cli::OutputFormat::Json);
        execute(args, &config, &writer).await.expect("load succeeds");

        assert!(dir.path().join("data").join(&config.store.key).exists());
    }
}
