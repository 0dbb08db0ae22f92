use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Connection settings for the shared `MongoStore`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Upper bound of the client pool shared by every repository
    pub pool_size: u32,
    pub connection_timeout_secs: u64,
}

fn required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| {
        error!("{} environment variable not found", key);
        ConfigError::EnvVarNotFound(key.to_string())
    })
}

fn numeric_or<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            error!("Invalid {} value: {}", key, raw);
            ConfigError::InvalidValue(format!("Invalid {} value", key))
        }),
        Err(_) => {
            warn!("{} not set, using default", key);
            Ok(default)
        }
    }
}

impl MongoConfig {
    /// Reads MONGO_URI and MONGO_DATABASE (required), MONGO_USERNAME and
    /// MONGO_PASSWORD, MONGO_POOL_SIZE (10) and MONGO_CONNECTION_TIMEOUT (5s).
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let config = MongoConfig {
            uri: required("MONGO_URI")?,
            database: required("MONGO_DATABASE")?,
            username: env::var("MONGO_USERNAME").ok(),
            password: env::var("MONGO_PASSWORD").ok(),
            pool_size: numeric_or("MONGO_POOL_SIZE", 10)?,
            connection_timeout_secs: numeric_or("MONGO_CONNECTION_TIMEOUT", 5)?,
        };
        debug!(
            database = %config.database,
            pool_size = config.pool_size,
            authenticated = config.username.is_some(),
            "MongoDB configuration read"
        );

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let problem = if !self.uri.starts_with("mongodb://") && !self.uri.starts_with("mongodb+srv://") {
            Some("MongoDB URI must start with mongodb:// or mongodb+srv://")
        } else if self.database.is_empty() {
            Some("MongoDB database cannot be empty")
        } else if self.pool_size == 0 {
            Some("MongoDB pool size must be greater than 0")
        } else if self.connection_timeout_secs == 0 {
            Some("MongoDB connection timeout must be greater than 0")
        } else if self.username.as_deref() == Some("") || self.password.as_deref() == Some("") {
            Some("MongoDB credentials cannot be empty if set")
        } else {
            None
        };

        match problem {
            Some(msg) => {
                error!("{}", msg);
                Err(ConfigError::ValidationError(msg.to_string()))
            }
            None => Ok(()),
        }
    }
}
