//! Configuration for Products API

use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(env!("CARGO_PKG_NAME"));
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://localhost:27017/shop")),
                ("MONGODB_DATABASE", None::<&str>),
                ("PORT", None::<&str>),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "products_api");
                assert_eq!(config.server.port, 3000);
                assert_eq!(config.mongodb.app_name.as_deref(), Some("products_api"));
                assert!(config.environment.is_production());
            },
        );
    }

    #[test]
    fn test_config_requires_mongo_uri() {
        temp_env::with_vars(
            [("MONGO_URI", None::<&str>), ("MONGODB_URL", None::<&str>)],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
