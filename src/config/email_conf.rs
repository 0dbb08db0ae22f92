use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// SMTP settings for outgoing OTP mail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Credentials are optional so local relays (mailpit, mailhog) work unauthenticated
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub use_tls: bool,
    pub use_starttls: bool,
    pub from_email: String,
    pub from_name: String,
    pub connection_timeout_secs: u64,
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => value.parse::<bool>().unwrap_or_else(|_| {
            warn!("{} has an invalid boolean value, defaulting to {}", name, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, defaulting to {}", name, default);
            default
        }
    }
}

impl EmailConfig {
    /// Create EmailConfig from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading email configuration from environment variables");

        let smtp_host = env::var("SMTP_HOST")
            .map_err(|_| {
                error!("SMTP_HOST environment variable not found");
                ConfigError::EnvVarNotFound("SMTP_HOST".to_string())
            })?;
        debug!("SMTP host: {}", smtp_host);

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| {
                warn!("SMTP_PORT not set, defaulting to 587");
                "587".to_string()
            })
            .parse::<u16>()
            .map_err(|_| {
                error!("Invalid SMTP_PORT value");
                ConfigError::InvalidValue("Invalid SMTP_PORT value".to_string())
            })?;
        debug!("SMTP port: {}", smtp_port);

        let smtp_username = env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty());
        let smtp_password = env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty());
        debug!("SMTP credentials provided: {}", smtp_username.is_some() && smtp_password.is_some());

        let use_tls = env_flag("SMTP_USE_TLS", true);
        let use_starttls = env_flag("SMTP_USE_STARTTLS", true);

        let from_email = env::var("SMTP_FROM_EMAIL")
            .map_err(|_| {
                error!("SMTP_FROM_EMAIL environment variable not found");
                ConfigError::EnvVarNotFound("SMTP_FROM_EMAIL".to_string())
            })?;
        debug!("From email: {}", from_email);

        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Tea Shop".to_string());

        let connection_timeout_secs = env::var("SMTP_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);
        debug!("Connection timeout: {} seconds", connection_timeout_secs);

        let config = EmailConfig {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            use_tls,
            use_starttls,
            from_email,
            from_name,
            connection_timeout_secs,
        };

        config.validate()?;
        info!("Email configuration loaded successfully");
        Ok(config)
    }

    /// Create EmailConfig for testing (local unauthenticated relay)
    pub fn from_test_env() -> Self {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: None,
            smtp_password: None,
            use_tls: false,
            use_starttls: false,
            from_email: "test@teashop.local".to_string(),
            from_name: "Tea Shop Test".to_string(),
            connection_timeout_secs: 10,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_host.is_empty() {
            error!("SMTP host is empty");
            return Err(ConfigError::ValidationError("SMTP host cannot be empty".to_string()));
        }

        if self.smtp_port == 0 {
            error!("SMTP port is 0");
            return Err(ConfigError::ValidationError("SMTP port cannot be 0".to_string()));
        }

        if self.smtp_username.is_some() != self.smtp_password.is_some() {
            error!("Only one of SMTP username / password is set");
            return Err(ConfigError::ValidationError("SMTP username and password must be set together".to_string()));
        }

        if !self.from_email.contains('@') {
            error!("Invalid from email format");
            return Err(ConfigError::ValidationError("Invalid from email format".to_string()));
        }

        if self.connection_timeout_secs == 0 {
            error!("Connection timeout is 0");
            return Err(ConfigError::ValidationError("Connection timeout cannot be 0".to_string()));
        }

        Ok(())
    }

    /// `Name <address>` form used for the From header
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            use_tls: true,
            use_starttls: true,
            from_email: "noreply@teashop.local".to_string(),
            from_name: "Tea Shop".to_string(),
            connection_timeout_secs: 30,
        }
    }
}
