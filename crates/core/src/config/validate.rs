use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Progress tick interval is not 0
/// - Progress ceiling is within (0, 100]
/// - Progress step is finite and not negative
/// - Export buffer size is not 0 and the file prefix is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.orchestrator.progress_tick_ms == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.progress_tick_ms cannot be 0".to_string(),
        ));
    }

    let ceiling = config.orchestrator.progress_ceiling;
    if !(ceiling > 0.0 && ceiling <= 100.0) {
        return Err(ConfigError::ValidationError(format!(
            "orchestrator.progress_ceiling must be in (0, 100], got {}",
            ceiling
        )));
    }

    let max_step = config.orchestrator.progress_max_step;
    if !(max_step.is_finite() && max_step >= 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "orchestrator.progress_max_step must be a finite value >= 0, got {}",
            max_step
        )));
    }

    if config.export.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "export.buffer_size cannot be 0".to_string(),
        ));
    }

    if config.export.file_prefix.is_empty() {
        return Err(ConfigError::ValidationError(
            "export.file_prefix cannot be empty".to_string(),
        ));
    }

    Ok(())
}
