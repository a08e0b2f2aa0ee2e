//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.history.max_entries == 0 {
            return Err(ConfigError::ValidationError(
                "history.max_entries must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.display.max_width == 0 || self.display.max_height == 0 {
            return Err(ConfigError::ValidationError(
                "display.max_width and display.max_height must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_history_bound() {
        let mut config = Config::default();
        config.history.max_entries = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_entries"));
    }

    #[test]
    fn test_validate_rejects_zero_dimension_limit() {
        let mut config = Config::default();
        config.limits.max_image_dimension = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_image_dimension"));
    }

    #[test]
    fn test_validate_rejects_zero_display_bounds() {
        let mut config = Config::default();
        config.display.max_height = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("display"));
    }
}
