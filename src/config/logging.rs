use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log level '{level}': {reason}")]
    InvalidLogLevel { level: String, reason: String },

    #[error("failed to initialize logging: {0}")]
    Init(String),
}

/// Installs the global tracing subscriber. `level` accepts any
/// `EnvFilter` directive, e.g. "info" or "account_service=debug".
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidLogLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_directive_is_rejected_before_install() {
        let err = init_logging("no=such=level").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLogLevel { .. }));
    }
}
