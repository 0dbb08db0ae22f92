use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Configuration for the emailed password-reset codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Number of digits in a generated code
    pub otp_length: usize,
    /// Lifetime of a code in seconds
    pub otp_expiration_secs: u64,
}

impl OtpConfig {
    /// Create OtpConfig from environment variables
    ///
    /// - OTP_LENGTH: digits per code (defaults to 6)
    /// - OTP_EXPIRATION_SECS: code lifetime (defaults to 3600)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading OTP configuration from environment variables");

        let otp_length = env::var("OTP_LENGTH")
            .unwrap_or_else(|_| {
                warn!("OTP_LENGTH not set, defaulting to 6 digits");
                "6".to_string()
            })
            .parse::<usize>()
            .map_err(|_| {
                error!("Invalid OTP_LENGTH value");
                ConfigError::InvalidValue("Invalid OTP_LENGTH value".to_string())
            })?;
        debug!("OTP length: {} digits", otp_length);

        let otp_expiration_secs = env::var("OTP_EXPIRATION_SECS")
            .unwrap_or_else(|_| {
                warn!("OTP_EXPIRATION_SECS not set, defaulting to 3600 seconds (1 hour)");
                "3600".to_string()
            })
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid OTP_EXPIRATION_SECS value");
                ConfigError::InvalidValue("Invalid OTP_EXPIRATION_SECS value".to_string())
            })?;
        debug!("OTP expiration: {} seconds", otp_expiration_secs);

        let config = OtpConfig {
            otp_length,
            otp_expiration_secs,
        };

        config.validate()?;
        info!("OTP configuration loaded successfully");
        Ok(config)
    }

    /// Create OtpConfig for testing
    pub fn from_test_env() -> Self {
        OtpConfig {
            otp_length: 6,
            otp_expiration_secs: 600,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        info!("Validating OTP configuration");

        if self.otp_length < 4 || self.otp_length > 10 {
            error!("OTP length out of range: {}", self.otp_length);
            return Err(ConfigError::ValidationError("OTP length must be between 4 and 10 digits".to_string()));
        }

        if self.otp_expiration_secs == 0 {
            error!("OTP expiration is 0");
            return Err(ConfigError::ValidationError("OTP expiration cannot be 0".to_string()));
        }

        info!("OTP configuration validation successful");
        Ok(())
    }

    /// Expiration expressed in whole minutes, for email copy
    pub fn expiration_minutes(&self) -> u64 {
        (self.otp_expiration_secs + 59) / 60
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        OtpConfig {
            otp_length: 6,
            otp_expiration_secs: 3600, // 1 hour
        }
    }
}
