//! Diagnostics for the tlview CLI.
//!
//! Reports and tables are the only thing tlview writes to stdout, so
//! `tlview --output json view | jq` keeps working at any log level.
//! Every diagnostic goes to stderr through `tracing-subscriber`.

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tlview_core::config::GeneralConfig;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over `log_level` (already merged with `--log-level`).
/// `log_format` picks `json` lines or multi-line `pretty` records.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.log_format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "pretty" => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    };

    installed.with_context(|| format!("failed to install {} log subscriber", config.log_format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_is_rejected_before_install() {
        let config = GeneralConfig {
            log_format: "xml".to_owned(),
            ..GeneralConfig::default()
        };
        let err = init_tracing(&config).expect_err("xml is not a log format");
        assert!(err.to_string().contains("'xml'"));
    }
}
