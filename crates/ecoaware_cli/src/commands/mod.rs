pub mod articles;
pub mod campaigns;
pub mod goals;
pub mod staff;

use anyhow::Context;
use ecoaware_core::AppConfig;

/// Starts file logging for commands that touch the database.
pub fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    ecoaware_core::init_logging(config.log_level, &config.log_dir)
        .with_context(|| format!("cannot start logging in {}", config.log_dir.display()))
}

#[cfg(test)]
mod tests {
    use super::init_logging;
    use ecoaware_core::{AppConfig, LoggingError};
    use std::path::PathBuf;

    #[test]
    fn logging_failure_keeps_typed_cause() {
        let config = AppConfig {
            log_dir: PathBuf::from("relative/logs"),
            ..AppConfig::default()
        };
        let err = init_logging(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoggingError>(),
            Some(LoggingError::InvalidLogDir(_))
        ));
    }
}
