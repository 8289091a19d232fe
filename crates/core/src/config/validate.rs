use super::{types::Config, ConfigError};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let storage = &config.storage;
    if storage.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "storage.max_upload_bytes cannot be 0".to_string(),
        ));
    }
    if storage.retention_secs == 0 {
        return Err(ConfigError::ValidationError(
            "storage.retention_secs cannot be 0".to_string(),
        ));
    }
    if storage.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "storage.sweep_interval_secs cannot be 0".to_string(),
        ));
    }
    if storage.upload_dir == storage.download_dir {
        return Err(ConfigError::ValidationError(
            "storage.upload_dir and storage.download_dir must differ".to_string(),
        ));
    }

    let converter = &config.converter;
    if converter.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.timeout_secs cannot be 0".to_string(),
        ));
    }
    if converter.mp3_bitrate_kbps == 0 {
        return Err(ConfigError::ValidationError(
            "converter.mp3_bitrate_kbps cannot be 0".to_string(),
        ));
    }

    Ok(())
}
