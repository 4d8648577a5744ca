use super::{Config, ConfigError};

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate severity
        self.log_level.parse::<crate::domain::SeverityLevel>()?;

        // Validate address is present; its form is checked when the client is built
        if self.address.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Server address must not be empty".to_string(),
            ));
        }

        // Validate timeouts
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Connection timeout must be greater than 0".to_string(),
            ));
        }

        if let Some(token) = &self.token
            && token.trim().is_empty()
        {
            return Err(ConfigError::InvalidConfig(
                "Token must not be empty when provided".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let config = Config {
            connect_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(msg)) if msg.contains("timeout")
        ));
    }

    #[test]
    fn test_blank_token_is_invalid() {
        let config = Config {
            token: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_address_is_invalid() {
        let config = Config {
            address: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
