//! Configuration validation utilities.
//!
//! Only runtime-level settings are checked here; adapters validate their
//! own sections when they are created.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BusConfig, LogOutput, LoggingConfig, RelayConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &RelayConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_bus_config(&config.bus)?;
    validate_adapter_names(config)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid log filter module name: '{module}'"
        )));
    }

    Ok(())
}

/// Validates bus settings.
fn validate_bus_config(bus: &BusConfig) -> ConfigResult<()> {
    if bus.buffer_size == 0 {
        return Err(ConfigError::validation(
            "Bus buffer size must be greater than 0",
        ));
    }
    Ok(())
}

/// Validates adapter section names.
fn validate_adapter_names(config: &RelayConfig) -> ConfigResult<()> {
    for name in config.adapters.keys() {
        if name.is_empty() || name.contains(' ') {
            return Err(ConfigError::validation(format!(
                "Invalid adapter name: '{name}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::schema::LogLevel;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_file_output_without_path() {
        let mut config = RelayConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_empty_filter_module() {
        let mut config = RelayConfig::default();
        config.logging.filters.insert(" ".to_string(), LogLevel::Debug);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_buffer() {
        let mut config = RelayConfig::default();
        config.bus.buffer_size = 0;
        assert!(validate_config(&config).is_err());
    }
}
