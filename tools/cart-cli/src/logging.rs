//! Logging subscriber initialisation.

use anyhow::Result;
use tracing_subscriber::{
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. Logs go to stderr so `--json` output on
/// stdout stays parseable.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    match config.log_format {
        LogFormat::Compact => init_with_layer(
            config,
            verbose,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_writer(std::io::stderr),
        ),
        LogFormat::Json => init_with_layer(
            config,
            verbose,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true)
                .with_writer(std::io::stderr),
        ),
    }
}

fn build_env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},hyper=warn,hyper_util=warn,reqwest=warn", level))
    })
}

fn init_with_layer<L>(config: &LoggingConfig, verbose: bool, fmt_layer: L) -> Result<()>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config, verbose))
        .try_init()?;
    Ok(())
}
