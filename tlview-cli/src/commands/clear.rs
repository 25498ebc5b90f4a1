//! `tlview clear` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use tlview_core::config::TlviewConfig;
use tlview_pipeline::PipelineConfig;

use crate::commands::open_session;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `clear` command.
pub async fn execute(config: &TlviewConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let pipeline = PipelineConfig::from_core(config);
    let mut session = open_session(&pipeline);

    let store_path = session.store().map(|s| s.path().display().to_string());
    let existed = store_path
        .as_deref()
        .is_some_and(|p| std::path::Path::new(p).exists());

    session.clear().await?;
    info!(existed, "persisted dataset cleared");

    writer.render(&ClearReport {
        store_path,
        removed: existed,
    })?;
    Ok(())
}

#[derive(Serialize)]
pub struct ClearReport {
    /// None when the store is disabled
    pub store_path: Option<String>,
    pub removed: bool,
}

impl Render for ClearReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.store_path {
            None => writeln!(w, "Store is disabled; nothing to clear")?,
            Some(path) if self.removed => {
                writeln!(w, "{} persisted dataset ({})", "Cleared".green(), path)?
            }
            Some(path) => writeln!(w, "No persisted dataset at {}", path)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn render(report: &ClearReport) -> String {
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_clear_report_render_variants() {
        assert!(
            render(&ClearReport {
                store_path: None,
                removed: false
            })
            .contains("disabled")
        );
        assert!(
            render(&ClearReport {
                store_path: Some("/tmp/x".to_owned()),
                removed: true
            })
            .contains("Cleared")
        );
        assert!(
            render(&ClearReport {
                store_path: Some("/tmp/x".to_owned()),
                removed: false
            })
            .contains("No persisted dataset")
        );
    }

    #[tokio::test]
    async fn test_execute_clear_removes_blob() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut config = TlviewConfig::default();
        config.general.data_dir = dir.path().display().to_string();

        let blob = dir.path().join(&config.store.key);
        std::fs::write(&blob, "{\"a\":{}}\n").expect("write blob");

        let writer = OutputWriter::new(OutputFormat::Json);
        execute(&config, &writer).await.expect("clear succeeds");
        assert!(!blob.exists());

        // 두 번째 호출도 성공해야 함
        execute(&config, &writer).await.expect("clear is idempotent");
    }
}
