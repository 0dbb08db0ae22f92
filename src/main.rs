use dotenv::dotenv;
use tracing::{info, warn};

use tea_shop_backend::app::app::App;
use tea_shop_backend::config::app_conf::AppConfig;
use tea_shop_backend::util::logger::Logger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv();

    let config = AppConfig::from_env();
    // keep the guards alive so file writers flush on exit
    let _logger = Logger::new(&config.log_dir)?;

    info!("Starting Tea Shop Backend");
    if let Err(e) = env_loaded {
        warn!("Failed to load .env file: {} (using system env vars)", e);
    }

    App::new().await?.start().await
}
