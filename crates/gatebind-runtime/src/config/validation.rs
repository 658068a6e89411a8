//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BindingConfig, GatebindConfig, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &GatebindConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_binding_config(&config.binding)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File {
        match &logging.file_path {
            None => {
                return Err(ConfigError::validation(
                    "logging.file_path is required when logging.output is \"file\"",
                ));
            }
            Some(path) if path.file_name().is_none() => {
                return Err(ConfigError::validation(format!(
                    "logging.file_path must name a file: {}",
                    path.display()
                )));
            }
            Some(_) => {}
        }
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "logging.filters contains an empty module name: {module:?}"
        )));
    }

    Ok(())
}

/// Validates binding settings.
fn validate_binding_config(binding: &BindingConfig) -> ConfigResult<()> {
    for (code, message) in &binding.messages {
        if code.trim().is_empty() {
            return Err(ConfigError::validation(
                "binding.messages contains an empty error code",
            ));
        }
        if message.trim().is_empty() {
            return Err(ConfigError::validation(format!(
                "binding.messages.{code} must not be empty"
            )));
        }
    }
    Ok(())
}
