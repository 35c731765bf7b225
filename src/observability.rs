use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn setup_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    match config.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(env_filter)
            .with_current_span(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .try_init(),
        LogFormat::Pretty => {
            let format = fmt::format()
                .with_target(true)
                .with_thread_ids(true)
                .compact();

            fmt()
                .event_format(format)
                .with_env_filter(env_filter)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .try_init()
        }
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
