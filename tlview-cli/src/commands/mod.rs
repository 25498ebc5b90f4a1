//! Command handlers -- one module per subcommand

pub mod clear;
pub mod config;
pub mod load;
pub mod summary;
pub mod view;

use tracing::debug;

use tlview_core::config::TlviewConfig;
use tlview_pipeline::{
    AnySource, FileBlobStore, LatestState, PipelineConfig, RestoreOutcome, Session,
};

use crate::cli::DecodeArgs;
use crate::error::CliError;

/// Session type used by every command: file-backed store, state kept in memory.
pub type CliSession = Session<FileBlobStore, LatestState>;

/// Build the pipeline config, applying command-line decode overrides.
pub fn pipeline_config(config: &TlviewConfig, decode: DecodeArgs) -> PipelineConfig {
    let mut pipeline = PipelineConfig::from_core(config);
    if decode.lenient {
        pipeline.strict = false;
    }
    pipeline
}

/// Open a session backed by the configured store.
pub fn open_session(config: &PipelineConfig) -> CliSession {
    let store = config
        .store_enabled
        .then(|| FileBlobStore::from_config(config));
    Session::new(config, store, LatestState::default())
}

/// Fill a session either from an explicit source (never persisted) or from the store.
///
/// Returns a human-readable description of where the dataset came from.
pub async fn populate(
    config: &PipelineConfig,
    source: Option<&str>,
) -> Result<(CliSession, String), CliError> {
    match source {
        Some(arg) => {
            // 명시적 소스는 저장소를 건드리지 않음
            let mut session: CliSession = Session::new(config, None, LatestState::default());
            let source = AnySource::from_arg(arg, config)?;
            let report = session.load(&source).await?;
            Ok((session, report.source))
        }
        None => {
            let mut session = open_session(config);
            let outcome = session.restore().await;
            debug!(?outcome, "restore finished");
            match outcome {
                RestoreOutcome::Restored { .. } => {
                    Ok((session, config.store_path().display().to_string()))
                }
                RestoreOutcome::NothingStored => Err(CliError::Command(
                    "no dataset loaded; run `tlview load <SOURCE>` first".to_owned(),
                )),
                RestoreOutcome::Discarded { reason } => Err(CliError::Command(format!(
                    "persisted dataset was unreadable and has been discarded ({}); load it again",
                    reason
                ))),
                RestoreOutcome::Disabled => Err(CliError::Command(
                    "store is disabled; pass --source to read a dataset directly".to_owned(),
                )),
            }
        }
    }
}
