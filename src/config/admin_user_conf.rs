use std::env;
use serde::{Serialize, Deserialize};
use crate::config::ConfigError;

/// Credentials for the admin account created on first start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let email = env::var("ADMIN_EMAIL").map_err(|_| ConfigError::EnvVarNotFound("ADMIN_EMAIL".to_string()))?;
        let password = env::var("ADMIN_PASSWORD").map_err(|_| ConfigError::EnvVarNotFound("ADMIN_PASSWORD".to_string()))?;
        let username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        if !email.contains('@') {
            return Err(ConfigError::InvalidValue("ADMIN_EMAIL must be an email address".to_string()));
        }
        if password.len() < 8 {
            return Err(ConfigError::InvalidValue("ADMIN_PASSWORD must be at least 8 characters".to_string()));
        }
        Ok(AdminUserConfig { username, email, password })
    }
}
