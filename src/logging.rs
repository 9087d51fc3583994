/*!
 * Logging and tracing initialization
 */

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::ConfigError;

/// Log output options taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    /// Emit one JSON object per event instead of compact text
    pub json: bool,
    /// Lower the default level to debug
    pub debug: bool,
}

impl LogOptions {
    pub fn level(&self) -> Level {
        if self.debug {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_directives(&self) -> String {
        let level = self.level().as_str().to_lowercase();
        format!("virtuoso_health={},tower_http={}", level, level)
    }
}

/// Initialize structured logging. `RUST_LOG` overrides the default filter.
pub fn init_logging(options: LogOptions) -> Result<(), ConfigError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(options.default_directives()))
        .map_err(|e| ConfigError::Invalid(format!("Failed to create log filter: {}", e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if options.json {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::NONE)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_span_events(FmtSpan::NONE)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| ConfigError::Invalid(format!("Failed to install logger: {}", e)))
}
