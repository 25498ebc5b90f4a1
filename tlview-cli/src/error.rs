//! CLI-specific error types and exit code mapping

use tlview_core::error::TlviewError;
use tlview_pipeline::PipelineError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The input source could not be read or fetched.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The input was malformed or contained no records.
    #[error("invalid input: {0}")]
    Input(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from tlview-core.
    #[error("{0}")]
    Core(#[from] TlviewError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                |
    /// |------|----------------------------------------|
    /// | 0    | Success                                |
    /// | 1    | General / command error                |
    /// | 2    | Configuration error                    |
    /// | 3    | Source unavailable                     |
    /// | 4    | Malformed or empty input               |
    /// | 10   | IO error                               |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::SourceUnavailable(_) => 3,
            Self::Input(_) => 4,
            Self::Io(_) => 10,
            Self::Core(core) => match core {
                TlviewError::Config(_) => 2,
                TlviewError::Source(_) => 3,
                TlviewError::Decode(_) => 4,
                TlviewError::Io(_) => 10,
                TlviewError::Store(_) => 1,
            },
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::MalformedLine { .. } | PipelineError::EmptyInput => {
                Self::Input(e.to_string())
            }
            PipelineError::SourceUnavailable {
                source_name,
                reason,
            } => Self::SourceUnavailable(format!("{}: {}", source_name, reason)),
            PipelineError::Config { .. } => Self::Config(e.to_string()),
            PipelineError::Io(io) => Self::Io(io),
            PipelineError::CorruptedPersistedState { .. } | PipelineError::Store(_) => {
                Self::Command(e.to_string())
            }
        }
    }
}
