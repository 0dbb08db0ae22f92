use std::env;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory for the rolling log files
    pub log_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
        AppConfig { host, port, log_dir }
    }
}
