use mongodb::{
    options::{ClientOptions, Credential, ResolverConfig},
    Client, Database,
};
use tracing::info;

use crate::config::MongoConfig;

pub const USERS: &str = "users";
pub const PRODUCTS: &str = "products";
pub const CARTS: &str = "carts";
pub const ORDERS: &str = "orders";
pub const INVENTORIES: &str = "inventories";
pub const PURCHASES: &str = "purchases";

/// The one client (and its pool) every repository borrows from.
#[derive(Clone)]
pub struct MongoStore {
    pub client: Client,
    pub database: Database,
}

impl MongoStore {
    pub async fn connect(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let mut client_options =
            ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
        client_options.app_name = Some("TeaShopBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }

        let client = Client::with_options(client_options)?;
        let database = client.database(&config.database);
        info!(database = %config.database, "MongoDB client ready");
        Ok(MongoStore { client, database })
    }
}
