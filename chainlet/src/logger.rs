//! Logging initialisation via tracing-subscriber.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use crate::error::AppError;

/// Level used when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialise the global tracing subscriber, logs go to stderr.
///
/// An explicit `level` wins over `RUST_LOG`; without one `RUST_LOG` is used
/// and [`DEFAULT_LEVEL`] is the fallback.
pub fn init(level: Option<&str>) -> Result<(), AppError> {
    let filter = match level {
        Some(level) => {
            parse_level(level)?;
            EnvFilter::try_new(level)
                .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))?
        },
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_LEVEL))
            .map_err(|e| AppError::Logger(format!("RUST_LOG parse failed: {e}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

/// Check that `level` is one of `error`, `warn`, `info`, `debug`, `trace`, `off`.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        for l in ["error", "warn", "info", "debug", "trace", "off"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
        assert!(parse_level("verbose").is_err());
        assert!(parse_level("").is_err());
    }
}
